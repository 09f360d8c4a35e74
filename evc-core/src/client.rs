//! Native HTTP client for the vote-count backend.

use crate::api::{
    decode_json, upload_percent, CsvUpload, ProgressGate, VoteApi, CSV_MIME, POLLS_PATH,
    PROCESS_VOTES_PATH, UPLOAD_FIELD,
};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::poll::PollRecord;
use crate::tally::AggregatedResult;
use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use serde::de::DeserializeOwned;

/// Size of the pieces the upload body is streamed in; progress is
/// reported once per piece.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// One configured `reqwest` client used for every backend call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;
        Ok(ApiClient { http, config })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        let body = ensure_success(response, &url)?.text().await?;
        decode_json(&body)
    }
}

fn ensure_success(response: Response, url: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// Split the upload into a streamed body that reports each piece it hands
/// to the transport on `progress`.
fn progress_body(
    contents: &[u8],
    progress: tokio::sync::mpsc::UnboundedSender<u8>,
) -> Body {
    let total = contents.len() as u64;
    let chunks: Vec<Vec<u8>> = contents
        .chunks(UPLOAD_CHUNK_SIZE)
        .map(<[u8]>::to_vec)
        .collect();
    let mut sent: u64 = 0;
    let stream = futures::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        let _ = progress.send(upload_percent(sent, total));
        Ok::<Vec<u8>, std::io::Error>(chunk)
    });
    Body::wrap_stream(stream)
}

#[async_trait(?Send)]
impl VoteApi for ApiClient {
    async fn fetch_polls(&self) -> Result<Vec<PollRecord>, ApiError> {
        let polls: Vec<PollRecord> = self.get_json(POLLS_PATH).await?;
        info!("Fetched {} poll records", polls.len());
        Ok(polls)
    }

    async fn process_votes(
        &self,
        upload: CsvUpload,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<AggregatedResult, ApiError> {
        let url = self.config.endpoint(PROCESS_VOTES_PATH);
        let total = upload.len();
        info!("POST {} ({} bytes from {})", url, total, upload.file_name);

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<u8>();
        let part = Part::stream_with_length(progress_body(&upload.contents, tx), total)
            .file_name(upload.file_name.clone())
            .mime_str(CSV_MIME)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let mut gate = ProgressGate::default();
        let request = self.http.post(&url).multipart(form).send();
        tokio::pin!(request);
        let sent = loop {
            tokio::select! {
                Some(pct) = rx.recv() => gate.offer(pct, on_progress),
                result = &mut request => break result,
            }
        };
        while let Ok(pct) = rx.try_recv() {
            gate.offer(pct, on_progress);
        }

        let response = ensure_success(sent?, &url)?;
        gate.complete(on_progress);
        let body = response.text().await?;
        decode_json(&body)
    }
}
