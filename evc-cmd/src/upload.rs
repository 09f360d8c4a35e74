//! `upload`: post a CSV of votes, follow the upload flow, save the result.

use anyhow::{bail, Context};
use evc_core::{AggregatedResult, CsvUpload, VoteApi};
use evc_export::write_workbook;
use evc_flow::notice::NoticeKind;
use evc_flow::session::UploadSession;
use evc_flow::upload::{drive_upload, Reaction, SelectedFile, UploadEvent, UploadState};
use log::{debug, error, info, warn};
use std::path::Path;

/// Progress is logged every this many percent.
const PROGRESS_LOG_STEP: u8 = 10;

/// Only `.csv` files are accepted, like the page's file picker.
pub fn validate_csv_path(path: &Path) -> anyhow::Result<()> {
    if !path.is_file() {
        bail!("{} does not exist or is not a file", path.display());
    }
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!("{} is not a .csv file", path.display());
    }
    Ok(())
}

fn log_notice(session: &UploadSession) {
    if let Some(notice) = session.notice() {
        match notice.kind {
            NoticeKind::Loading | NoticeKind::Success => info!("{}", notice.message),
            NoticeKind::Error => error!("{}", notice.message),
        }
    }
}

/// Upload `file`, write the spreadsheet to `output` and optionally the raw
/// response to `save_json`.
pub async fn run_upload<A: VoteApi + ?Sized>(
    api: &A,
    file: &Path,
    output: &Path,
    save_json: Option<&Path>,
) -> anyhow::Result<AggregatedResult> {
    validate_csv_path(file)?;
    let contents = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let mut session = UploadSession::default();
    session.handle(UploadEvent::Select(SelectedFile::new(
        file_name.clone(),
        contents.len() as u64,
    )));
    let ticket = match session.handle(UploadEvent::Submit) {
        Reaction::Start { ticket, .. } => ticket,
        Reaction::Warn(warning) => bail!("{}", warning.message()),
        other => bail!("upload did not start: {:?}", other),
    };
    log_notice(&session);

    let mut last_logged = 0u8;
    drive_upload(api, ticket, CsvUpload::new(file_name, contents), &mut |event| {
        let reaction = session.handle(event);
        match reaction {
            Reaction::Updated => {
                let progress = session.state().progress();
                if progress == 100 || progress >= last_logged.saturating_add(PROGRESS_LOG_STEP) {
                    info!("Upload progress: {}%", progress);
                    last_logged = progress;
                }
            }
            Reaction::Stale => debug!("Ignoring event for a finished upload"),
            Reaction::Succeeded | Reaction::Failed(_) => log_notice(&session),
            other => warn!("Unexpected upload reaction {:?}", other),
        }
    })
    .await;

    let result = match session.state() {
        UploadState::Done { result, .. } => result.clone(),
        UploadState::Failed { failure, .. } => bail!("upload failed: {}", failure),
        other => bail!("upload ended in state {:?}", other),
    };

    write_workbook(&result, output).with_context(|| format!("failed to write {}", output.display()))?;
    info!("Spreadsheet saved to {}", output.display());

    if let Some(path) = save_json {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Response saved to {}", path.display());
    }

    Ok(result)
}
