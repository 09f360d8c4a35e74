//! Browser implementations of the backend client and DOM helpers.
//!
//! Requests go through `XMLHttpRequest` because it is the only browser API
//! that reports upload progress. Every request carries the configured
//! timeout, and dropping a pending request future aborts the XHR.

use async_trait::async_trait;
use evc_core::api::{
    decode_json, upload_percent, ProgressGate, CSV_MIME, POLLS_PATH, PROCESS_VOTES_PATH, UPLOAD_FIELD,
};
use evc_core::{AggregatedResult, ApiConfig, ApiError, CsvUpload, PollRecord, VoteApi};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use js_sys::{Array, Promise, Uint8Array};
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, Event, File, FormData, HtmlAnchorElement, HtmlInputElement, ProgressEvent, Url,
    XmlHttpRequest,
};

fn js_error(value: JsValue) -> ApiError {
    ApiError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

enum XhrEvent {
    Progress { loaded: f64, total: f64 },
    Load,
    Error,
    Timeout,
    Abort,
}

type Listener = Closure<dyn FnMut(Event)>;

fn listener(tx: &UnboundedSender<XhrEvent>, map: fn(&Event) -> Option<XhrEvent>) -> Listener {
    let tx = tx.clone();
    Closure::new(move |event: Event| {
        if let Some(mapped) = map(&event) {
            let _ = tx.unbounded_send(mapped);
        }
    })
}

fn upload_progress(event: &Event) -> Option<XhrEvent> {
    event
        .dyn_ref::<ProgressEvent>()
        .filter(|p| p.length_computable())
        .map(|p| XhrEvent::Progress {
            loaded: p.loaded(),
            total: p.total(),
        })
}

/// An XHR in flight. Dropping it before it completes aborts the request.
struct PendingXhr {
    xhr: XmlHttpRequest,
    url: String,
    events: UnboundedReceiver<XhrEvent>,
    listeners: Vec<Listener>,
    track_upload: bool,
    finished: bool,
}

impl PendingXhr {
    fn open(method: &str, url: String, config: &ApiConfig, track_upload: bool) -> Result<Self, ApiError> {
        let xhr = XmlHttpRequest::new().map_err(js_error)?;
        xhr.open(method, &url).map_err(js_error)?;
        xhr.set_timeout(config.timeout().as_millis().min(u32::MAX as u128) as u32);

        let (tx, events) = unbounded();
        let on_load = listener(&tx, |_| Some(XhrEvent::Load));
        let on_error = listener(&tx, |_| Some(XhrEvent::Error));
        let on_timeout = listener(&tx, |_| Some(XhrEvent::Timeout));
        let on_abort = listener(&tx, |_| Some(XhrEvent::Abort));
        xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
        xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        xhr.set_ontimeout(Some(on_timeout.as_ref().unchecked_ref()));
        xhr.set_onabort(Some(on_abort.as_ref().unchecked_ref()));
        let mut listeners = vec![on_load, on_error, on_timeout, on_abort];

        if track_upload {
            let on_progress = listener(&tx, upload_progress);
            xhr.upload()
                .map_err(js_error)?
                .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));
            listeners.push(on_progress);
        }

        Ok(PendingXhr {
            xhr,
            url,
            events,
            listeners,
            track_upload,
            finished: false,
        })
    }

    /// Wait for the request to end. Upload progress is passed to
    /// `on_progress` as `(loaded, total)` bytes.
    async fn finish(&mut self, on_progress: &mut dyn FnMut(u64, u64)) -> Result<String, ApiError> {
        while let Some(event) = self.events.next().await {
            match event {
                XhrEvent::Progress { loaded, total } => on_progress(loaded as u64, total as u64),
                XhrEvent::Load => {
                    self.finished = true;
                    let status = self.xhr.status().map_err(js_error)?;
                    if !(200..300).contains(&status) {
                        return Err(ApiError::Status {
                            status,
                            url: self.url.clone(),
                        });
                    }
                    return Ok(self.xhr.response_text().map_err(js_error)?.unwrap_or_default());
                }
                XhrEvent::Timeout => {
                    self.finished = true;
                    return Err(ApiError::Timeout);
                }
                XhrEvent::Error => {
                    self.finished = true;
                    return Err(ApiError::Network(format!("request to {} failed", self.url)));
                }
                XhrEvent::Abort => {
                    self.finished = true;
                    return Err(ApiError::Network(format!("request to {} was aborted", self.url)));
                }
            }
        }
        Err(ApiError::Network(format!("request to {} ended without a result", self.url)))
    }
}

impl Drop for PendingXhr {
    fn drop(&mut self) {
        if !self.finished {
            debug!("Aborting pending request to {}", self.url);
            let _ = self.xhr.abort();
        }
        self.xhr.set_onload(None);
        self.xhr.set_onerror(None);
        self.xhr.set_ontimeout(None);
        self.xhr.set_onabort(None);
        if self.track_upload {
            if let Ok(upload) = self.xhr.upload() {
                upload.set_onprogress(None);
            }
        }
        self.listeners.clear();
    }
}

fn bytes_to_blob(bytes: &[u8], mime: &str) -> Result<Blob, JsValue> {
    let parts = Array::of1(&Uint8Array::from(bytes).into());
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// `VoteApi` over `XMLHttpRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserClient {
    config: ApiConfig,
}

impl BrowserClient {
    pub fn new(config: ApiConfig) -> Self {
        BrowserClient { config }
    }
}

#[async_trait(?Send)]
impl VoteApi for BrowserClient {
    async fn fetch_polls(&self) -> Result<Vec<PollRecord>, ApiError> {
        let url = self.config.endpoint(POLLS_PATH);
        debug!("GET {}", url);
        let mut request = PendingXhr::open("GET", url, &self.config, false)?;
        request.xhr.send().map_err(js_error)?;
        let body = request.finish(&mut |_, _| {}).await?;
        let polls: Vec<PollRecord> = decode_json(&body)?;
        info!("Fetched {} poll records", polls.len());
        Ok(polls)
    }

    async fn process_votes(
        &self,
        upload: CsvUpload,
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<AggregatedResult, ApiError> {
        let url = self.config.endpoint(PROCESS_VOTES_PATH);
        info!("POST {} ({} bytes from {})", url, upload.len(), upload.file_name);

        let blob = bytes_to_blob(&upload.contents, CSV_MIME).map_err(js_error)?;
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename(UPLOAD_FIELD, &blob, &upload.file_name)
            .map_err(js_error)?;

        let mut request = PendingXhr::open("POST", url, &self.config, true)?;
        request.xhr.send_with_opt_form_data(Some(&form)).map_err(js_error)?;

        let mut gate = ProgressGate::default();
        let body = request
            .finish(&mut |loaded, total| gate.offer(upload_percent(loaded, total), &mut *on_progress))
            .await?;
        gate.complete(on_progress);
        decode_json(&body)
    }
}

/// The file currently chosen in the `<input type="file">` with `input_id`.
pub fn selected_file(input_id: &str) -> Option<File> {
    web_sys::window()?
        .document()?
        .get_element_by_id(input_id)?
        .dyn_into::<HtmlInputElement>()
        .ok()?
        .files()?
        .get(0)
}

pub async fn read_file(file: &File) -> Result<Vec<u8>, ApiError> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(|e| {
        error!("Failed to read {}: {:?}", file.name(), e);
        ApiError::Io(format!("could not read {}", file.name()))
    })?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// Offer `bytes` to the user as a download named `file_name`.
pub fn download_bytes(bytes: &[u8], file_name: &str, mime: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let blob = bytes_to_blob(bytes, mime)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}

/// Resolve after `ms` milliseconds.
pub async fn sleep_ms(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Blocking browser alert, used for input warnings.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
