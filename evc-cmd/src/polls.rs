//! `polls`: fetch poll records, aggregate them per date and report the trend.

use anyhow::Context;
use evc_chart::{render_svg, ChartOptions};
use evc_core::VoteApi;
use evc_data::polls::{AggregatedSeries, DailySeriesPoint, PollAggregator};
use evc_utils::percent::format_percentage;
use log::{info, warn};
use std::path::Path;

/// Fetch, aggregate and print the poll series; optionally save it as CSV
/// and as an SVG chart.
pub async fn run_polls<A: VoteApi + ?Sized>(
    api: &A,
    csv_path: Option<&Path>,
    svg_path: Option<&Path>,
) -> anyhow::Result<AggregatedSeries> {
    let records = api.fetch_polls().await.context("failed to fetch poll records")?;
    info!("Fetched {} poll records", records.len());

    let aggregator = PollAggregator::default();
    let series = aggregator.aggregate(&records);
    if !series.warnings.is_empty() {
        warn!("{} poll records had data-quality problems", series.warnings.len());
    }
    for (label, count) in &series.dropped_candidates {
        info!("Ignored {} records for untracked candidate {}", count, label);
    }

    let candidates = aggregator.candidates();
    for point in &series.points {
        println!(
            "{}  {}: {}  {}: {}",
            point.date,
            candidates.a.display_name,
            format_percentage(point.candidate_a),
            candidates.b.display_name,
            format_percentage(point.candidate_b)
        );
    }

    if let Some(path) = csv_path {
        write_series_csv(&series.points, path)?;
        info!("Series written to {}", path.display());
    }

    if let Some(path) = svg_path {
        let options = ChartOptions {
            candidates: candidates.clone(),
            ..ChartOptions::default()
        };
        let chart = render_svg(&series.points, &options)?;
        std::fs::write(path, chart.svg).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Chart written to {}", path.display());
    }

    Ok(series)
}

/// Write the series with a `data,A,B` header.
pub fn write_series_csv(points: &[DailySeriesPoint], path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;
    if points.is_empty() {
        writer.write_record(["data", "A", "B"])?;
    }
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_result, FakeApi};
    use evc_core::{ApiError, PollRecord};

    fn record(id: i64, candidate: &str, result: &str, date: &str) -> PollRecord {
        PollRecord {
            id,
            poll_id: "1".to_string(),
            candidate: candidate.to_string(),
            result: result.to_string(),
            poll_date: date.to_string(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_polls_writes_csv_and_svg() {
        let api = FakeApi::new(
            Ok(vec![
                record(1, "A", "41,5%", "2024-10-01"),
                record(2, "B", "38%", "2024-10-01"),
                record(3, "A", "43", "2024-10-08T12:00:00Z"),
                record(4, "C", "5", "2024-10-08T12:00:00Z"),
            ]),
            Ok(sample_result()),
        );
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("series.csv");
        let svg_path = dir.path().join("chart.svg");

        let series = run_polls(&api, Some(&csv_path), Some(&svg_path)).await.unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.dropped_candidates.get("C"), Some(&1));

        let csv_text = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines[0], "data,A,B");
        assert_eq!(lines[1], "01/10/2024,41.5,38.0");
        assert_eq!(lines[2], "09/10/2024,43.0,0.0");

        let svg = std::fs::read_to_string(&svg_path).unwrap();
        assert!(svg.contains("Candidato A"));
    }

    #[tokio::test]
    async fn test_polls_empty_csv_has_header() {
        let api = FakeApi::new(Ok(vec![]), Ok(sample_result()));
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("series.csv");
        let series = run_polls(&api, Some(&csv_path), None).await.unwrap();
        assert!(series.is_empty());
        assert_eq!(std::fs::read_to_string(&csv_path).unwrap().trim(), "data,A,B");
    }

    #[tokio::test]
    async fn test_polls_fetch_error() {
        let api = FakeApi::new(Err(ApiError::Timeout), Ok(sample_result()));
        let err = run_polls(&api, None, None).await.unwrap_err();
        assert!(err.to_string().contains("failed to fetch poll records"));
    }
}
