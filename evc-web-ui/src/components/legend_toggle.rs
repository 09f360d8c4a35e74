//! Legend buttons that show or hide each candidate's series.

use crate::state::AppState;
use dioxus::prelude::*;
use evc_chart::{COLOR_A, COLOR_B};

#[derive(Props, Clone, PartialEq)]
pub struct LegendToggleProps {
    pub name_a: String,
    pub name_b: String,
}

fn swatch(color: (u8, u8, u8), on: bool) -> String {
    format!(
        "display: inline-block; width: 12px; height: 12px; margin-right: 6px; border-radius: 2px; background: {};",
        if on {
            format!("rgb({}, {}, {})", color.0, color.1, color.2)
        } else {
            "#ccc".to_string()
        }
    )
}

#[component]
pub fn LegendToggle(props: LegendToggleProps) -> Element {
    let mut state = use_context::<AppState>();
    let visible = (state.visible)();
    let label_style = |on: bool| {
        format!(
            "cursor: pointer; border: none; background: none; padding: 4px 8px; {}",
            if on { "" } else { "text-decoration: line-through; color: #999;" }
        )
    };
    let style_a = label_style(visible.a);
    let style_b = label_style(visible.b);
    let swatch_a = swatch((COLOR_A.0, COLOR_A.1, COLOR_A.2), visible.a);
    let swatch_b = swatch((COLOR_B.0, COLOR_B.1, COLOR_B.2), visible.b);

    rsx! {
        div {
            style: "display: flex; gap: 12px; justify-content: center; margin: 8px 0;",
            button {
                style: "{style_a}",
                onclick: move |_| state.visible.with_mut(|v| v.a = !v.a),
                span { style: "{swatch_a}" }
                "{props.name_a}"
            }
            button {
                style: "{style_b}",
                onclick: move |_| state.visible.with_mut(|v| v.b = !v.b),
                span { style: "{swatch_b}" }
                "{props.name_b}"
            }
        }
    }
}
