//! Poll aggregation: flat poll records → per-date, per-candidate series.

use chrono::FixedOffset;
use evc_core::PollRecord;
use evc_utils::dates::{brasilia_offset, display_day, format_day_br, parse_timestamp};
use evc_utils::error::DateError;
use evc_utils::percent::parse_locale_percent;
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A candidate label as sent by the backend and its legend name.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub label: String,
    pub display_name: String,
}

impl Candidate {
    pub fn new(label: &str, display_name: &str) -> Self {
        Candidate {
            label: label.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// The two candidates that are charted. Records for any other label are
/// dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedCandidates {
    pub a: Candidate,
    pub b: Candidate,
}

impl Default for TrackedCandidates {
    fn default() -> Self {
        TrackedCandidates {
            a: Candidate::new("A", "Candidato A"),
            b: Candidate::new("B", "Candidato B"),
        }
    }
}

/// How a poll date becomes a display key.
///
/// The backend stores survey days as UTC midnight. The key is the calendar
/// day at `offset`, moved by `shift_days`, formatted "dd/mm/yyyy". With the
/// defaults (UTC-03:00, +1) a survey stored as 2024-10-01T00:00Z is keyed
/// "01/10/2024".
#[derive(Debug, Clone, PartialEq)]
pub struct DateKeyPolicy {
    pub offset: FixedOffset,
    pub shift_days: i64,
}

impl Default for DateKeyPolicy {
    fn default() -> Self {
        DateKeyPolicy {
            offset: brasilia_offset(),
            shift_days: 1,
        }
    }
}

impl DateKeyPolicy {
    pub fn date_key(&self, raw: &str) -> Result<String, DateError> {
        let instant = parse_timestamp(raw)?;
        Ok(format_day_br(&display_day(&instant, &self.offset, self.shift_days)))
    }
}

/// One chart point: both candidates' values for a single date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeriesPoint {
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "A")]
    pub candidate_a: f64,
    #[serde(rename = "B")]
    pub candidate_b: f64,
}

impl DailySeriesPoint {
    fn empty(date: String) -> Self {
        DailySeriesPoint {
            date,
            candidate_a: 0.0,
            candidate_b: 0.0,
        }
    }
}

/// Input problems that degrade the chart without failing it.
#[derive(Debug, Clone, PartialEq)]
pub enum DataQualityWarning {
    /// `resultado` held no number; charted as 0.
    MalformedResult { record_id: i64, raw: String },
    /// `dataPesquisa` could not be read; the record was skipped.
    MalformedDate { record_id: i64, raw: String },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::MalformedResult { record_id, raw } => {
                write!(f, "record {}: result {:?} is not a percentage, charted as 0", record_id, raw)
            }
            DataQualityWarning::MalformedDate { record_id, raw } => {
                write!(f, "record {}: date {:?} is not a date, record skipped", record_id, raw)
            }
        }
    }
}

/// Output of [`PollAggregator::aggregate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedSeries {
    /// One point per distinct display date, in first-seen order.
    pub points: Vec<DailySeriesPoint>,
    pub warnings: Vec<DataQualityWarning>,
    /// Untracked candidate label → number of records dropped.
    pub dropped_candidates: BTreeMap<String, usize>,
}

impl AggregatedSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Groups poll records by display date and candidate.
#[derive(Debug, Clone, Default)]
pub struct PollAggregator {
    candidates: TrackedCandidates,
    dates: DateKeyPolicy,
}

impl PollAggregator {
    pub fn new(candidates: TrackedCandidates, dates: DateKeyPolicy) -> Self {
        PollAggregator { candidates, dates }
    }

    pub fn candidates(&self) -> &TrackedCandidates {
        &self.candidates
    }

    /// Record order only matters when two records share a date and a
    /// candidate: the later one wins.
    pub fn aggregate(&self, records: &[PollRecord]) -> AggregatedSeries {
        let mut series = AggregatedSeries::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in records {
            let date = match self.dates.date_key(&record.poll_date) {
                Ok(date) => date,
                Err(e) => {
                    warn!("Skipping poll record {}: {}", record.id, e);
                    series.warnings.push(DataQualityWarning::MalformedDate {
                        record_id: record.id,
                        raw: record.poll_date.clone(),
                    });
                    continue;
                }
            };

            let slot = *index.entry(date.clone()).or_insert_with(|| {
                series.points.push(DailySeriesPoint::empty(date));
                series.points.len() - 1
            });

            // untracked labels still open their date but are never read
            let is_a = record.candidate == self.candidates.a.label;
            if !is_a && record.candidate != self.candidates.b.label {
                debug!("Dropping poll record {} for untracked candidate {}", record.id, record.candidate);
                *series
                    .dropped_candidates
                    .entry(record.candidate.clone())
                    .or_insert(0) += 1;
                continue;
            }

            let value = match parse_locale_percent(&record.result).filter(|v| v.is_finite()) {
                Some(value) => value,
                None => {
                    warn!(
                        "Poll record {} has malformed result {:?}, charting 0",
                        record.id, record.result
                    );
                    series.warnings.push(DataQualityWarning::MalformedResult {
                        record_id: record.id,
                        raw: record.result.clone(),
                    });
                    0.0
                }
            };

            let point = &mut series.points[slot];
            if is_a {
                point.candidate_a = value;
            } else {
                point.candidate_b = value;
            }
        }

        series
    }
}

/// Aggregate with the default candidates and date policy.
pub fn aggregate_polls(records: &[PollRecord]) -> AggregatedSeries {
    PollAggregator::default().aggregate(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn record(id: i64, candidate: &str, result: &str, date: &str) -> PollRecord {
        PollRecord {
            id,
            poll_id: format!("P{}", id),
            candidate: candidate.to_string(),
            result: result.to_string(),
            poll_date: date.to_string(),
            created_at: None,
        }
    }

    const D1: &str = "2024-10-01T00:00:00.000Z";
    const D2: &str = "2024-10-08T00:00:00.000Z";

    #[test]
    fn test_two_candidates_same_date() {
        let series = aggregate_polls(&[record(1, "A", "10,0%", D1), record(2, "B", "20,5%", D1)]);
        assert_eq!(
            series.points,
            vec![DailySeriesPoint {
                date: "01/10/2024".to_string(),
                candidate_a: 10.0,
                candidate_b: 20.5,
            }]
        );
        assert!(series.warnings.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let series = aggregate_polls(&[]);
        assert!(series.is_empty());
    }

    #[test]
    fn test_first_seen_date_order_and_missing_candidate_defaults_to_zero() {
        let series = aggregate_polls(&[
            record(1, "A", "41,0%", D2),
            record(2, "A", "40,0%", D1),
            record(3, "B", "35,5%", D2),
        ]);
        let dates: Vec<&str> = series.points.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["08/10/2024", "01/10/2024"]);
        assert_eq!(series.points[0].candidate_b, 35.5);
        assert_eq!(series.points[1].candidate_a, 40.0);
        assert_eq!(series.points[1].candidate_b, 0.0);
    }

    #[test]
    fn test_untracked_candidates_are_dropped_but_date_kept() {
        let series = aggregate_polls(&[
            record(1, "C", "12,0%", D1),
            record(2, "C", "13,0%", D2),
            record(3, "A", "50,0%", D2),
        ]);
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].candidate_a, 0.0);
        assert_eq!(series.points[0].candidate_b, 0.0);
        assert_eq!(series.dropped_candidates.get("C"), Some(&2));
    }

    #[test]
    fn test_untracked_candidate_result_is_not_checked() {
        let series = aggregate_polls(&[
            record(1, "C", "n/d", D1),
            record(2, "B", "33,0%", D1),
        ]);
        assert!(series.warnings.is_empty(), "{:?}", series.warnings);
        assert_eq!(series.dropped_candidates.get("C"), Some(&1));
        assert_eq!(series.points[0].candidate_b, 33.0);
    }

    #[test]
    fn test_one_point_per_distinct_date() {
        let records = vec![
            record(1, "A", "1%", D1),
            record(2, "B", "2%", "2024-10-01"),
            record(3, "A", "3%", D2),
            record(4, "X", "4%", "2024-10-15T00:00:00Z"),
            record(5, "B", "5%", D2),
        ];
        let series = aggregate_polls(&records);
        let distinct: HashSet<String> = records
            .iter()
            .map(|r| DateKeyPolicy::default().date_key(&r.poll_date).unwrap())
            .collect();
        assert_eq!(series.points.len(), distinct.len());
        assert_eq!(series.points.len(), 3);
    }

    #[test]
    fn test_later_record_wins() {
        let series = aggregate_polls(&[record(1, "A", "10%", D1), record(2, "A", "12,5%", D1)]);
        assert_eq!(series.points[0].candidate_a, 12.5);
    }

    #[test]
    fn test_malformed_result_charted_as_zero_with_warning() {
        let series = aggregate_polls(&[record(1, "A", "10%", D1), record(2, "A", "n/d", D1)]);
        assert_eq!(series.points[0].candidate_a, 0.0);
        assert_eq!(
            series.warnings,
            vec![DataQualityWarning::MalformedResult {
                record_id: 2,
                raw: "n/d".to_string()
            }]
        );
    }

    #[test]
    fn test_malformed_date_skips_record() {
        let series = aggregate_polls(&[record(1, "A", "10%", "amanhã"), record(2, "B", "20%", D1)]);
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].candidate_a, 0.0);
        assert!(matches!(
            series.warnings[0],
            DataQualityWarning::MalformedDate { record_id: 1, .. }
        ));
    }

    #[test]
    fn test_custom_policy_and_candidates() {
        let aggregator = PollAggregator::new(
            TrackedCandidates {
                a: Candidate::new("Lula", "Lula"),
                b: Candidate::new("Bolsonaro", "Bolsonaro"),
            },
            DateKeyPolicy {
                offset: FixedOffset::east_opt(0).unwrap(),
                shift_days: 0,
            },
        );
        let series = aggregator.aggregate(&[
            record(1, "Lula", "48,0%", D1),
            record(2, "Bolsonaro", "44,0%", D1),
        ]);
        assert_eq!(series.points[0].date, "01/10/2024");
        assert_eq!(series.points[0].candidate_a, 48.0);
        assert_eq!(series.points[0].candidate_b, 44.0);
    }

    #[test]
    fn test_point_serializes_with_chart_keys() {
        let point = DailySeriesPoint {
            date: "01/10/2024".to_string(),
            candidate_a: 1.5,
            candidate_b: 2.0,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json, serde_json::json!({"data": "01/10/2024", "A": 1.5, "B": 2.0}));
    }
}
