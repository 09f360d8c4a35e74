//! Backend contract shared by the native and the browser clients.

use crate::error::ApiError;
use crate::poll::PollRecord;
use crate::tally::AggregatedResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// `GET {base}/pesquisas` → JSON array of poll records.
pub const POLLS_PATH: &str = "pesquisas";

/// `POST {base}/processar-votos` (multipart) → aggregated result.
pub const PROCESS_VOTES_PATH: &str = "processar-votos";

/// Multipart field carrying the CSV file.
pub const UPLOAD_FIELD: &str = "arquivo";

pub const CSV_MIME: &str = "text/csv";

/// A CSV file ready to be posted.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvUpload {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl CsvUpload {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        CsvUpload {
            file_name: file_name.into(),
            contents,
        }
    }

    pub fn len(&self) -> u64 {
        self.contents.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Operations the front-ends need from the backend.
///
/// Futures are not required to be `Send` so the same trait can be
/// implemented on top of browser APIs.
#[async_trait(?Send)]
pub trait VoteApi {
    async fn fetch_polls(&self) -> Result<Vec<PollRecord>, ApiError>;

    /// Upload a CSV; `on_progress` receives the percentage of bytes sent.
    async fn process_votes(
        &self,
        upload: CsvUpload,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<AggregatedResult, ApiError>;
}

/// Percentage of `total` covered by `sent`, rounded and capped at 100.
/// Nothing to send counts as complete.
pub fn upload_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (sent.min(total) as f64 * 100.0 / total as f64).round();
    pct as u8
}

/// Forwards only strictly increasing progress values.
#[derive(Debug, Default)]
pub struct ProgressGate {
    last: Option<u8>,
}

impl ProgressGate {
    pub fn offer(&mut self, pct: u8, sink: &mut dyn FnMut(u8)) {
        let pct = pct.min(100);
        if self.last.map_or(true, |last| pct > last) {
            self.last = Some(pct);
            sink(pct);
        }
    }

    /// Report 100 if it has not been reported yet.
    pub fn complete(&mut self, sink: &mut dyn FnMut(u8)) {
        self.offer(100, sink);
    }
}

/// Decode a 2xx body, mapping any shape mismatch to `UnexpectedResponse`.
pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::UnexpectedResponse("empty response body".to_string()));
    }
    serde_json::from_str(body).map_err(|e| ApiError::UnexpectedResponse(e.to_string()))
}
