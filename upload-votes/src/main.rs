//! Vote CSV upload.
//!
//! The user picks a `.csv`, sends it to `{API_URL}/processar-votos` and
//! follows the upload in a progress bar and a toast. Once the backend
//! answers with the aggregated tallies, they can be downloaded as
//! `resultado.xlsx`.
//!
//! All transitions go through `UploadSession`; this file only wires DOM
//! events, the browser client and timers to it.

use dioxus::core::Task;
use dioxus::prelude::*;
use evc_core::CsvUpload;
use evc_export::{workbook_bytes, EXPORT_FILE_NAME};
use evc_flow::session::UploadSession;
use evc_flow::upload::{drive_upload, Reaction, SelectedFile, UploadEvent, UploadFailure};
use evc_web_ui::browser::{alert, download_bytes, read_file, selected_file, sleep_ms, BrowserClient};
use evc_web_ui::components::{ErrorDisplay, ProgressBar, ToastView};
use evc_web_ui::config::api_config;
use evc_web_ui::state::UploadAppState;

const FILE_INPUT_ID: &str = "votes-csv-input";

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("upload-votes-root"))
        .launch(App);
}

/// Start the auto-dismiss timer for the toast currently shown.
fn schedule_expiry(mut session: Signal<UploadSession>) {
    let Some(notice) = session.read().notice().cloned() else {
        return;
    };
    let delay = notice.auto_dismiss();
    spawn(async move {
        sleep_ms(delay.as_millis() as i32).await;
        session.write().expire_notice(notice.id, notice.revision);
    });
}

fn apply(mut session: Signal<UploadSession>, event: UploadEvent) -> Reaction {
    let reaction = session.write().handle(event);
    if matches!(reaction, Reaction::Start { .. } | Reaction::Succeeded | Reaction::Failed(_)) {
        schedule_expiry(session);
    }
    reaction
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(UploadAppState::new);
    let client = use_hook(|| {
        api_config().map(BrowserClient::new).map_err(|e| {
            log::error!("Backend is not configured: {}", e);
            e.to_string()
        })
    });
    let mut upload_task: Signal<Option<Task>> = use_signal(|| None);

    let on_file_change = move |_evt: Event<FormData>| {
        let Some(file) = selected_file(FILE_INPUT_ID) else {
            log::debug!("File picker closed without a selection");
            return;
        };
        let selection = SelectedFile::new(file.name(), file.size() as u64);
        log::info!("Selected {} ({} bytes)", selection.name, selection.size);
        if let Reaction::Superseded(_) = apply(state.session, UploadEvent::Select(selection)) {
            // the previous upload's events are stale now; stop its request too
            if let Some(task) = upload_task.write().take() {
                task.cancel();
            }
        }
        state.file.set(Some(file));
    };

    let submit_client = client.clone();
    let on_submit = move |_: MouseEvent| {
        let (ticket, selection) = match apply(state.session, UploadEvent::Submit) {
            Reaction::Start { ticket, file } => (ticket, file),
            Reaction::Warn(warning) => {
                alert(warning.message());
                return;
            }
            _ => return,
        };
        let Some(file) = state.file.read().clone() else {
            return;
        };
        let api = match &submit_client {
            Ok(api) => api.clone(),
            Err(e) => {
                apply(state.session, UploadEvent::Failed(ticket, UploadFailure::Network(e.clone())));
                return;
            }
        };
        let session = state.session;
        let task = spawn(async move {
            let contents = match read_file(&file).await {
                Ok(contents) => contents,
                Err(e) => {
                    apply(session, UploadEvent::Failed(ticket, UploadFailure::from(&e)));
                    return;
                }
            };
            let upload = CsvUpload::new(selection.name, contents);
            drive_upload(&api, ticket, upload, &mut |event| {
                apply(session, event);
            })
            .await;
        });
        upload_task.set(Some(task));
    };

    let on_download = move |_: MouseEvent| {
        let session = state.session.read();
        let Some(result) = session.state().result() else {
            return;
        };
        match workbook_bytes(result) {
            Ok(bytes) => {
                if let Err(e) = download_bytes(&bytes, EXPORT_FILE_NAME, XLSX_MIME) {
                    log::error!("Download failed: {:?}", e);
                }
            }
            Err(e) => log::error!("Failed to build {}: {}", EXPORT_FILE_NAME, e),
        }
    };

    let session = state.session.read();
    let upload_state = session.state();
    let has_file = state.file.read().is_some();
    let progress = upload_state.progress();
    let show_progress = upload_state.progress_visible();
    let summary = upload_state.result().map(|r| {
        format!(
            "Vencedor nacional: {} ({:.2}%) · Segundo colocado: {} ({:.2}%)",
            r.national_winner, r.national_winner_pct, r.national_runner_up, r.runner_up_pct
        )
    });
    let config_error = client.as_ref().err().cloned();

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 16px; max-width: 640px; margin: 0 auto;",
            h2 { "Upload de votos" }
            if let Some(err) = config_error {
                ErrorDisplay { message: err }
            }
            div {
                style: "display: flex; gap: 8px; align-items: center;",
                input {
                    id: FILE_INPUT_ID,
                    r#type: "file",
                    accept: ".csv",
                    onchange: on_file_change,
                }
                button {
                    disabled: !has_file,
                    onclick: on_submit,
                    "Enviar"
                }
            }
            if show_progress {
                ProgressBar { progress }
            }
            if let Some(summary) = summary {
                p { "{summary}" }
                button {
                    onclick: on_download,
                    "Baixar Excel"
                }
            }
            ToastView {}
        }
    }
}
