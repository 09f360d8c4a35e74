//! Error banner, optionally with a retry button.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    /// Shown as a "Tentar novamente" button when set
    #[props(default)]
    pub on_retry: Option<EventHandler<()>>,
}

#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    let retry = props.on_retry;
    rsx! {
        div {
            role: "alert",
            style: "display: flex; gap: 12px; align-items: center; justify-content: space-between; padding: 10px 14px; margin: 8px 0; background: #FDECEA; color: #B71C1C; border-left: 4px solid #D32F2F;",
            span { "{props.message}" }
            if let Some(handler) = retry {
                button {
                    style: "flex-shrink: 0; cursor: pointer;",
                    onclick: move |_| handler.call(()),
                    "Tentar novamente"
                }
            }
        }
    }
}
