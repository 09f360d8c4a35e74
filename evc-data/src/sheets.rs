//! Spreadsheet rows projected from an aggregated result.

use evc_core::{AggregatedResult, OrderedTallies};
use serde::Serialize;

pub const MUNICIPALITY_SHEET: &str = "Votos por Município";
pub const STATE_SHEET: &str = "Votos por Estado";
pub const NATIONAL_SHEET: &str = "Resultado Nacional";

pub const MUNICIPALITY_HEADERS: [&str; 3] = ["Município", "Votos_B", "Votos_A"];
pub const STATE_HEADERS: [&str; 3] = ["Estado", "Votos_B", "Votos_A"];
pub const NATIONAL_HEADERS: [&str; 4] = [
    "Vencedor Nacional",
    "Porcentagem Vencedor Nacional",
    "Segundo Colocado",
    "Porcentagem Segundo Colocado",
];

/// One municipality or state line. Missing counts are already 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyRow {
    pub name: String,
    pub votes_b: u64,
    pub votes_a: u64,
}

/// The single row of the national summary sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalRow {
    pub winner: String,
    pub winner_pct: f64,
    pub runner_up: String,
    pub runner_up_pct: f64,
}

/// Everything the three sheets contain, rows in backend order.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub municipalities: Vec<TallyRow>,
    pub states: Vec<TallyRow>,
    pub national: NationalRow,
}

pub fn tally_rows(tallies: &OrderedTallies) -> Vec<TallyRow> {
    tallies
        .iter()
        .map(|(name, tally)| TallyRow {
            name: name.to_string(),
            votes_b: tally.votes_b(),
            votes_a: tally.votes_a(),
        })
        .collect()
}

pub fn national_row(result: &AggregatedResult) -> NationalRow {
    NationalRow {
        winner: result.national_winner.clone(),
        winner_pct: result.national_winner_pct,
        runner_up: result.national_runner_up.clone(),
        runner_up_pct: result.runner_up_pct,
    }
}

impl From<&AggregatedResult> for SheetPlan {
    fn from(result: &AggregatedResult) -> Self {
        SheetPlan {
            municipalities: tally_rows(&result.votes_by_municipality),
            states: tally_rows(&result.votes_by_state),
            national: national_row(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evc_core::VoteTally;

    fn result(municipalities: OrderedTallies, states: OrderedTallies) -> AggregatedResult {
        AggregatedResult {
            votes_by_municipality: municipalities,
            votes_by_state: states,
            national_winner: "A".to_string(),
            national_winner_pct: 52.3,
            national_runner_up: "B".to_string(),
            runner_up_pct: 47.7,
        }
    }

    #[test]
    fn test_municipality_row_columns() {
        let municipalities: OrderedTallies =
            vec![("X".to_string(), VoteTally::new(3, 7))].into_iter().collect();
        let plan = SheetPlan::from(&result(municipalities, OrderedTallies::default()));
        assert_eq!(
            plan.municipalities,
            vec![TallyRow {
                name: "X".to_string(),
                votes_b: 7,
                votes_a: 3
            }]
        );
        assert!(plan.states.is_empty());
    }

    #[test]
    fn test_missing_counts_become_zero() {
        let states: OrderedTallies = vec![
            ("SP".to_string(), VoteTally { a: Some(5), b: None }),
            ("RJ".to_string(), VoteTally { a: None, b: None }),
        ]
        .into_iter()
        .collect();
        let rows = tally_rows(&states);
        assert_eq!(rows[0].votes_a, 5);
        assert_eq!(rows[0].votes_b, 0);
        assert_eq!(rows[1].votes_a, 0);
        assert_eq!(rows[1].votes_b, 0);
    }

    #[test]
    fn test_rows_follow_backend_order() {
        let parsed: AggregatedResult = serde_json::from_str(
            r#"{"votosPorMunicipio": {"Zé Doca": {"A": 1, "B": 2}, "Abaetetuba": {"A": 3, "B": 4}, "Manaus": {"A": 5, "B": 6}},
                "votosPorEstado": {"PA": {"A": 3, "B": 4}, "AM": {"A": 5, "B": 6}, "MA": {"A": 1, "B": 2}},
                "vencedorNacional": "B", "porcentagemVencedorNacional": 57.1,
                "SegundoColocado": "A", "porcentagemSegundoVencedorNacional": 42.9}"#,
        )
        .unwrap();
        let plan = SheetPlan::from(&parsed);
        let names: Vec<&str> = plan.municipalities.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zé Doca", "Abaetetuba", "Manaus"]);
        let states: Vec<&str> = plan.states.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(states, vec!["PA", "AM", "MA"]);
        assert_eq!(
            plan.national,
            NationalRow {
                winner: "B".to_string(),
                winner_pct: 57.1,
                runner_up: "A".to_string(),
                runner_up_pct: 42.9
            }
        );
    }
}
