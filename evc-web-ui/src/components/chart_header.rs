//! Chart title with a line describing what the series cover.

use dioxus::prelude::*;
use evc_data::polls::AggregatedSeries;

/// "12 datas de pesquisa", plus how many records of other candidates were
/// left out. `None` before anything was charted.
pub fn coverage_caption(series: &AggregatedSeries) -> Option<String> {
    let dates = match series.points.len() {
        0 => return None,
        1 => "1 data de pesquisa".to_string(),
        n => format!("{} datas de pesquisa", n),
    };
    let dropped: usize = series.dropped_candidates.values().sum();
    Some(match dropped {
        0 => dates,
        1 => format!("{} · 1 registro de outro candidato ignorado", dates),
        n => format!("{} · {} registros de outros candidatos ignorados", dates, n),
    })
}

#[derive(Props, Clone, PartialEq)]
pub struct ChartHeaderProps {
    pub title: String,
    #[props(default)]
    pub caption: Option<String>,
}

#[component]
pub fn ChartHeader(props: ChartHeaderProps) -> Element {
    rsx! {
        header {
            style: "display: flex; align-items: baseline; justify-content: space-between; margin-bottom: 8px;",
            h3 {
                style: "margin: 0; font-size: 16px;",
                "{props.title}"
            }
            if let Some(caption) = props.caption {
                small {
                    style: "color: #666;",
                    "{caption}"
                }
            }
        }
    }
}
