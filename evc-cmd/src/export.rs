//! `export`: offline conversion of a saved backend response to the spreadsheet.

use anyhow::Context;
use evc_core::AggregatedResult;
use evc_export::write_workbook;
use log::info;
use std::path::Path;

pub fn run_export(json_path: &Path, output: &Path) -> anyhow::Result<()> {
    let body = std::fs::read_to_string(json_path)
        .with_context(|| format!("failed to read {}", json_path.display()))?;
    let result: AggregatedResult = serde_json::from_str(&body)
        .with_context(|| format!("{} is not an aggregated vote result", json_path.display()))?;
    info!(
        "Exporting result won by {} ({:.2}%)",
        result.national_winner, result.national_winner_pct
    );
    write_workbook(&result, output).with_context(|| format!("failed to write {}", output.display()))?;
    info!("Spreadsheet saved to {}", output.display());
    Ok(())
}
