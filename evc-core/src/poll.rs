use serde::{Deserialize, Serialize};

/// One candidate's measured support in one survey round.
///
/// Dates are kept exactly as the backend sent them; they are only parsed
/// when the records are grouped for charting, so a single malformed date
/// does not reject the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollRecord {
    pub id: i64,
    #[serde(rename = "idPesquisa")]
    pub poll_id: String,
    #[serde(rename = "candidato")]
    pub candidate: String,
    /// Locale formatted percentage, e.g. "42,5%"
    #[serde(rename = "resultado")]
    pub result: String,
    #[serde(rename = "dataPesquisa")]
    pub poll_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
}
