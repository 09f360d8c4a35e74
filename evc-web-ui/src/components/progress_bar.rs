//! Determinate upload progress bar.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ProgressBarProps {
    /// 0..=100
    pub progress: u8,
}

#[component]
pub fn ProgressBar(props: ProgressBarProps) -> Element {
    let width = format!("width: {}%; height: 100%; background: #1976D2; transition: width 0.2s;", props.progress.min(100));
    rsx! {
        div {
            style: "margin: 12px 0;",
            div {
                role: "progressbar",
                "aria-valuemin": "0",
                "aria-valuemax": "100",
                "aria-valuenow": "{props.progress}",
                style: "height: 8px; background: #E3F2FD; border-radius: 4px; overflow: hidden;",
                div { style: "{width}" }
            }
            span {
                style: "font-size: 12px; color: #555;",
                "{props.progress}%"
            }
        }
    }
}
