use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Votes for the two candidates in one municipality or state.
///
/// Either count may be missing (or `null`) in the backend payload; the
/// accessors read a missing count as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub a: Option<u64>,
    #[serde(rename = "B", default, skip_serializing_if = "Option::is_none")]
    pub b: Option<u64>,
}

impl VoteTally {
    pub fn new(a: u64, b: u64) -> Self {
        VoteTally {
            a: Some(a),
            b: Some(b),
        }
    }

    pub fn votes_a(&self) -> u64 {
        self.a.unwrap_or(0)
    }

    pub fn votes_b(&self) -> u64 {
        self.b.unwrap_or(0)
    }
}

/// Name → tally pairs in the order the backend sent them.
///
/// A JSON object is read into a list so iteration follows the payload,
/// never a hash or alphabetical order. A repeated key keeps its first
/// position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedTallies(Vec<(String, VoteTally)>);

impl OrderedTallies {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VoteTally)> {
        self.0.iter().map(|(name, tally)| (name.as_str(), tally))
    }

    pub fn get(&self, name: &str) -> Option<&VoteTally> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, VoteTally)> for OrderedTallies {
    fn from_iter<I: IntoIterator<Item = (String, VoteTally)>>(iter: I) -> Self {
        let mut entries: Vec<(String, VoteTally)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (name, tally) in iter {
            match index.get(&name) {
                Some(&i) => entries[i].1 = tally,
                None => {
                    index.insert(name.clone(), entries.len());
                    entries.push((name, tally));
                }
            }
        }
        OrderedTallies(entries)
    }
}

impl Serialize for OrderedTallies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, tally)| (name, tally)))
    }
}

struct OrderedTalliesVisitor;

impl<'de> Visitor<'de> for OrderedTalliesVisitor {
    type Value = OrderedTallies;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping names to vote tallies")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, tally)) = access.next_entry::<String, VoteTally>()? {
            pairs.push((name, tally));
        }
        Ok(pairs.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for OrderedTallies {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedTalliesVisitor)
    }
}

/// Backend summary of a full vote dataset.
///
/// Received wholesale per upload and only projected into spreadsheet rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    #[serde(rename = "votosPorMunicipio")]
    pub votes_by_municipality: OrderedTallies,
    #[serde(rename = "votosPorEstado")]
    pub votes_by_state: OrderedTallies,
    #[serde(rename = "vencedorNacional")]
    pub national_winner: String,
    #[serde(rename = "porcentagemVencedorNacional")]
    pub national_winner_pct: f64,
    #[serde(rename = "SegundoColocado")]
    pub national_runner_up: String,
    #[serde(rename = "porcentagemSegundoVencedorNacional")]
    pub runner_up_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "votosPorMunicipio": {"Santos": {"A": 3, "B": 7}, "Campinas": {"A": 10}, "Bauru": {"B": null}},
        "votosPorEstado": {"SP": {"A": 13, "B": 7}, "MG": {"A": 1, "B": 2}},
        "vencedorNacional": "A",
        "porcentagemVencedorNacional": 60.5,
        "SegundoColocado": "B",
        "porcentagemSegundoVencedorNacional": 39.5
    }"#;

    #[test]
    fn test_deserialize_keeps_backend_order() {
        let result: AggregatedResult = serde_json::from_str(RESPONSE).unwrap();
        let names: Vec<&str> = result.votes_by_municipality.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Santos", "Campinas", "Bauru"]);
        let states: Vec<&str> = result.votes_by_state.iter().map(|(n, _)| n).collect();
        assert_eq!(states, vec!["SP", "MG"]);
        assert_eq!(result.national_winner, "A");
        assert_eq!(result.runner_up_pct, 39.5);
    }

    #[test]
    fn test_missing_counts_read_as_zero() {
        let result: AggregatedResult = serde_json::from_str(RESPONSE).unwrap();
        let campinas = result.votes_by_municipality.get("Campinas").unwrap();
        assert_eq!(campinas.votes_a(), 10);
        assert_eq!(campinas.votes_b(), 0);
        let bauru = result.votes_by_municipality.get("Bauru").unwrap();
        assert_eq!(bauru.votes_a(), 0);
        assert_eq!(bauru.votes_b(), 0);
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let tallies: OrderedTallies =
            serde_json::from_str(r#"{"X": {"A": 1}, "Y": {"A": 2}, "X": {"A": 3}}"#).unwrap();
        let entries: Vec<(&str, u64)> = tallies.iter().map(|(n, t)| (n, t.votes_a())).collect();
        assert_eq!(entries, vec![("X", 3), ("Y", 2)]);
    }

    #[test]
    fn test_serialize_preserves_order() {
        let result: AggregatedResult = serde_json::from_str(RESPONSE).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let santos = json.find("Santos").unwrap();
        let campinas = json.find("Campinas").unwrap();
        let bauru = json.find("Bauru").unwrap();
        assert!(santos < campinas && campinas < bauru);
        let again: AggregatedResult = serde_json::from_str(&json).unwrap();
        assert_eq!(again, result);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        assert!(serde_json::from_str::<AggregatedResult>(r#"{"ok": true}"#).is_err());
        assert!(serde_json::from_str::<AggregatedResult>("[]").is_err());
    }
}
