//! Spreadsheet export of an aggregated vote result.
//!
//! The workbook has three sheets: votes per municipality, votes per state
//! and the national summary. Row order follows the backend response.

use evc_core::AggregatedResult;
use evc_data::sheets::{
    NationalRow, SheetPlan, TallyRow, MUNICIPALITY_HEADERS, MUNICIPALITY_SHEET, NATIONAL_HEADERS,
    NATIONAL_SHEET, STATE_HEADERS, STATE_SHEET,
};
use log::info;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use thiserror::Error;

/// Name the downloaded workbook is saved under.
pub const EXPORT_FILE_NAME: &str = "resultado.xlsx";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], bold: &Format) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, bold)?;
    }
    Ok(())
}

fn write_tally_sheet(
    workbook: &mut Workbook,
    name: &str,
    headers: &[&str],
    rows: &[TallyRow],
    bold: &Format,
) -> Result<(), XlsxError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;
    write_headers(sheet, headers, bold)?;
    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, &row.name)?;
        sheet.write_number(r, 1, row.votes_b as f64)?;
        sheet.write_number(r, 2, row.votes_a as f64)?;
    }
    sheet.autofit();
    Ok(())
}

fn write_national_sheet(workbook: &mut Workbook, row: &NationalRow, bold: &Format) -> Result<(), XlsxError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(NATIONAL_SHEET)?;
    write_headers(sheet, &NATIONAL_HEADERS, bold)?;
    sheet.write_string(1, 0, &row.winner)?;
    sheet.write_number(1, 1, row.winner_pct)?;
    sheet.write_string(1, 2, &row.runner_up)?;
    sheet.write_number(1, 3, row.runner_up_pct)?;
    sheet.autofit();
    Ok(())
}

fn build_workbook(result: &AggregatedResult) -> Result<Workbook, ExportError> {
    let plan = SheetPlan::from(result);
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();
    write_tally_sheet(
        &mut workbook,
        MUNICIPALITY_SHEET,
        &MUNICIPALITY_HEADERS,
        &plan.municipalities,
        &bold,
    )?;
    write_tally_sheet(&mut workbook, STATE_SHEET, &STATE_HEADERS, &plan.states, &bold)?;
    write_national_sheet(&mut workbook, &plan.national, &bold)?;
    Ok(workbook)
}

/// Write the workbook to `path`.
pub fn write_workbook(result: &AggregatedResult, path: &Path) -> Result<(), ExportError> {
    let mut workbook = build_workbook(result)?;
    workbook.save(path)?;
    info!(
        "Wrote {} municipalities and {} states to {}",
        result.votes_by_municipality.len(),
        result.votes_by_state.len(),
        path.display()
    );
    Ok(())
}

/// The workbook as xlsx bytes, for a browser download.
pub fn workbook_bytes(result: &AggregatedResult) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(result)?;
    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Range, Reader, Xlsx};
    use std::io::Cursor;

    fn sample() -> AggregatedResult {
        serde_json::from_str(
            r#"{"votosPorMunicipio": {"São Paulo": {"A": 3, "B": 7}, "Belém": {"A": 10}},
                "votosPorEstado": {"SP": {"A": 3, "B": 7}, "PA": {"B": 2, "A": 10}},
                "vencedorNacional": "A", "porcentagemVencedorNacional": 59.09,
                "SegundoColocado": "B", "porcentagemSegundoVencedorNacional": 40.91}"#,
        )
        .unwrap()
    }

    fn cell_text(range: &Range<Data>, row: usize, col: usize) -> String {
        match range.get((row, col)) {
            Some(Data::String(s)) => s.clone(),
            other => panic!("expected string at ({}, {}), got {:?}", row, col, other),
        }
    }

    fn cell_number(range: &Range<Data>, row: usize, col: usize) -> f64 {
        match range.get((row, col)) {
            Some(Data::Float(v)) => *v,
            Some(Data::Int(v)) => *v as f64,
            other => panic!("expected number at ({}, {}), got {:?}", row, col, other),
        }
    }

    #[test]
    fn test_write_workbook_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        write_workbook(&sample(), &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec![MUNICIPALITY_SHEET, STATE_SHEET, NATIONAL_SHEET]
        );

        let municipalities = workbook.worksheet_range(MUNICIPALITY_SHEET).unwrap();
        assert_eq!(municipalities.height(), 3);
        assert_eq!(cell_text(&municipalities, 0, 0), "Município");
        assert_eq!(cell_text(&municipalities, 0, 1), "Votos_B");
        assert_eq!(cell_text(&municipalities, 0, 2), "Votos_A");
        assert_eq!(cell_text(&municipalities, 1, 0), "São Paulo");
        assert_eq!(cell_number(&municipalities, 1, 1), 7.0);
        assert_eq!(cell_number(&municipalities, 1, 2), 3.0);
        // missing B count is written as 0
        assert_eq!(cell_text(&municipalities, 2, 0), "Belém");
        assert_eq!(cell_number(&municipalities, 2, 1), 0.0);

        let states = workbook.worksheet_range(STATE_SHEET).unwrap();
        assert_eq!(cell_text(&states, 0, 0), "Estado");
        assert_eq!(cell_text(&states, 2, 0), "PA");
        assert_eq!(cell_number(&states, 2, 1), 2.0);

        let national = workbook.worksheet_range(NATIONAL_SHEET).unwrap();
        assert_eq!(national.height(), 2);
        assert_eq!(cell_text(&national, 0, 3), "Porcentagem Segundo Colocado");
        assert_eq!(cell_text(&national, 1, 0), "A");
        assert_eq!(cell_number(&national, 1, 1), 59.09);
        assert_eq!(cell_text(&national, 1, 2), "B");
        assert_eq!(cell_number(&national, 1, 3), 40.91);
    }

    #[test]
    fn test_workbook_bytes_readable() {
        let bytes = workbook_bytes(&sample()).unwrap();
        assert!(bytes.starts_with(b"PK"));
        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        let states = workbook.worksheet_range(STATE_SHEET).unwrap();
        assert_eq!(cell_text(&states, 1, 0), "SP");
    }

    #[test]
    fn test_empty_result_still_has_headers() {
        let result: AggregatedResult = serde_json::from_str(
            r#"{"votosPorMunicipio": {}, "votosPorEstado": {},
                "vencedorNacional": "", "porcentagemVencedorNacional": 0,
                "SegundoColocado": "", "porcentagemSegundoVencedorNacional": 0}"#,
        )
        .unwrap();
        let mut workbook = Xlsx::new(Cursor::new(workbook_bytes(&result).unwrap())).unwrap();
        let municipalities = workbook.worksheet_range(MUNICIPALITY_SHEET).unwrap();
        assert_eq!(municipalities.height(), 1);
        assert_eq!(cell_text(&municipalities, 0, 0), "Município");
    }
}
