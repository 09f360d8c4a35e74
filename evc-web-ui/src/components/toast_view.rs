//! Toast for the upload lifecycle (loading, success, error).

use crate::state::UploadAppState;
use dioxus::prelude::*;
use evc_flow::notice::NoticeKind;

fn palette(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Loading => "background: #E3F2FD; color: #0D47A1; border: 1px solid #90CAF9;",
        NoticeKind::Success => "background: #E8F5E9; color: #1B5E20; border: 1px solid #A5D6A7;",
        NoticeKind::Error => "background: #FFEBEE; color: #C62828; border: 1px solid #EF9A9A;",
    }
}

#[component]
pub fn ToastView() -> Element {
    let mut state = use_context::<UploadAppState>();
    let notice = state.session.read().notice().cloned();

    let Some(notice) = notice else {
        return rsx! {};
    };
    let style = format!(
        "position: fixed; top: 16px; right: 16px; padding: 12px 16px; border-radius: 4px; \
         display: flex; gap: 12px; align-items: center; {}",
        palette(notice.kind)
    );

    rsx! {
        div {
            role: "status",
            style: "{style}",
            span { "{notice.message}" }
            button {
                style: "border: none; background: none; cursor: pointer; font-size: 16px; color: inherit;",
                onclick: move |_| {
                    state.session.write().dismiss_notice();
                },
                "×"
            }
        }
    }
}
