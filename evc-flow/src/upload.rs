//! Upload state machine.
//!
//! `Idle → Selected → Uploading(p) → Done | Failed`, with a new selection
//! allowed from every state. Each submission gets an [`UploadTicket`];
//! events carrying any other ticket are stale and leave the state alone,
//! so a superseded upload can never write over a newer one.

use evc_core::{AggregatedResult, ApiError, CsvUpload, VoteApi};
use log::{error, info};

/// The file the user picked.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        SelectedFile {
            name: name.into(),
            size,
        }
    }
}

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

/// Why an upload ended in `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadFailure {
    /// Transport failure or non-2xx status.
    Network(String),
    /// 2xx with a payload of the wrong shape.
    UnexpectedResponse(String),
}

impl From<&ApiError> for UploadFailure {
    fn from(value: &ApiError) -> Self {
        match value {
            ApiError::UnexpectedResponse(detail) => UploadFailure::UnexpectedResponse(detail.clone()),
            other => UploadFailure::Network(other.to_string()),
        }
    }
}

impl std::fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadFailure::Network(detail) => write!(f, "network error: {}", detail),
            UploadFailure::UnexpectedResponse(detail) => write!(f, "unexpected response: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    Selected { file: SelectedFile },
    Uploading { file: SelectedFile, progress: u8 },
    Done { file: SelectedFile, result: AggregatedResult },
    Failed { file: SelectedFile, failure: UploadFailure },
}

impl UploadState {
    pub fn file(&self) -> Option<&SelectedFile> {
        match self {
            UploadState::Idle => None,
            UploadState::Selected { file }
            | UploadState::Uploading { file, .. }
            | UploadState::Done { file, .. }
            | UploadState::Failed { file, .. } => Some(file),
        }
    }

    /// 0 outside `Uploading`.
    pub fn progress(&self) -> u8 {
        match self {
            UploadState::Uploading { progress, .. } => *progress,
            _ => 0,
        }
    }

    pub fn result(&self) -> Option<&AggregatedResult> {
        match self {
            UploadState::Done { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }

    /// The progress bar is only drawn while a transfer is partially done.
    pub fn progress_visible(&self) -> bool {
        let progress = self.progress();
        progress > 0 && progress < 100
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Select(SelectedFile),
    Submit,
    Progress(UploadTicket, u8),
    Succeeded(UploadTicket, AggregatedResult),
    Failed(UploadTicket, UploadFailure),
}

/// User-facing reasons a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadWarning {
    NoFileSelected,
    UploadInFlight,
}

impl UploadWarning {
    pub fn message(&self) -> &'static str {
        match self {
            UploadWarning::NoFileSelected => "Selecione um arquivo para upload!",
            UploadWarning::UploadInFlight => "Aguarde o envio em andamento terminar.",
        }
    }
}

/// What the caller has to do after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    /// State changed (or not); nothing else to do.
    Updated,
    /// Post `file` and report back with `ticket`.
    Start { ticket: UploadTicket, file: SelectedFile },
    /// Show the warning; state is unchanged.
    Warn(UploadWarning),
    /// A new selection replaced the upload holding `ticket`.
    Superseded(UploadTicket),
    Succeeded,
    Failed(UploadFailure),
    /// Event for a ticket that is no longer active; ignored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct UploadMachine {
    state: UploadState,
    active: Option<UploadTicket>,
    issued: u64,
}

impl Default for UploadMachine {
    fn default() -> Self {
        UploadMachine {
            state: UploadState::Idle,
            active: None,
            issued: 0,
        }
    }
}

impl UploadMachine {
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn handle(&mut self, event: UploadEvent) -> Reaction {
        match event {
            UploadEvent::Select(file) => {
                self.state = UploadState::Selected { file };
                match self.active.take() {
                    Some(ticket) => Reaction::Superseded(ticket),
                    None => Reaction::Updated,
                }
            }
            UploadEvent::Submit => self.submit(),
            UploadEvent::Progress(ticket, pct) => {
                if self.active != Some(ticket) {
                    return Reaction::Stale;
                }
                if let UploadState::Uploading { progress, .. } = &mut self.state {
                    *progress = (*progress).max(pct.min(100));
                }
                Reaction::Updated
            }
            UploadEvent::Succeeded(ticket, result) => {
                if self.active != Some(ticket) {
                    return Reaction::Stale;
                }
                self.active = None;
                let file = self.current_file();
                self.state = UploadState::Done { file, result };
                Reaction::Succeeded
            }
            UploadEvent::Failed(ticket, failure) => {
                if self.active != Some(ticket) {
                    return Reaction::Stale;
                }
                self.active = None;
                let file = self.current_file();
                self.state = UploadState::Failed {
                    file,
                    failure: failure.clone(),
                };
                Reaction::Failed(failure)
            }
        }
    }

    fn submit(&mut self) -> Reaction {
        let file = match &self.state {
            UploadState::Idle => return Reaction::Warn(UploadWarning::NoFileSelected),
            UploadState::Uploading { .. } => return Reaction::Warn(UploadWarning::UploadInFlight),
            UploadState::Selected { file }
            | UploadState::Done { file, .. }
            | UploadState::Failed { file, .. } => file.clone(),
        };
        self.issued += 1;
        let ticket = UploadTicket(self.issued);
        self.active = Some(ticket);
        self.state = UploadState::Uploading {
            file: file.clone(),
            progress: 0,
        };
        Reaction::Start { ticket, file }
    }

    // Only reached with an active ticket, which implies `Uploading`.
    fn current_file(&self) -> SelectedFile {
        self.state
            .file()
            .cloned()
            .unwrap_or_else(|| SelectedFile::new("", 0))
    }
}

/// Post `upload` for `ticket` and report every step through `dispatch`.
///
/// Errors never escape: they are logged and dispatched as `Failed`.
pub async fn drive_upload<A: VoteApi + ?Sized>(
    api: &A,
    ticket: UploadTicket,
    upload: CsvUpload,
    dispatch: &mut dyn FnMut(UploadEvent),
) {
    let file_name = upload.file_name.clone();
    let outcome = api
        .process_votes(upload, &mut |pct| dispatch(UploadEvent::Progress(ticket, pct)))
        .await;
    match outcome {
        Ok(result) => {
            info!(
                "Upload of {} processed: {} municipalities, {} states",
                file_name,
                result.votes_by_municipality.len(),
                result.votes_by_state.len()
            );
            dispatch(UploadEvent::Succeeded(ticket, result));
        }
        Err(e) => {
            error!("Upload of {} failed: {}", file_name, e);
            dispatch(UploadEvent::Failed(ticket, UploadFailure::from(&e)));
        }
    }
}
