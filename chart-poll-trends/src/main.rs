//! Presidential election poll trends.
//!
//! Data flow:
//! 1. On mount (and on each retry): fetch all poll records from
//!    `{API_URL}/pesquisas`.
//! 2. Aggregate them into one point per display date with both candidates.
//! 3. Render the series to SVG; re-render only when the series or the
//!    legend toggles change. Pointer moves just pick the hovered point.

use dioxus::prelude::*;
use evc_chart::{render_svg, tooltip_lines, ChartOptions, RenderedChart};
use evc_core::VoteApi;
use evc_data::polls::{PollAggregator, TrackedCandidates};
use evc_web_ui::browser::BrowserClient;
use evc_web_ui::components::{
    coverage_caption, ChartContainer, ChartHeader, ErrorDisplay, LegendToggle, LoadingSpinner,
};
use evc_web_ui::config::api_config;
use evc_web_ui::state::AppState;

/// DOM id for the chart frame.
const CHART_CONTAINER_ID: &str = "poll-trends-chart";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("poll-trends-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let candidates = TrackedCandidates::default();
    // bumped by the retry button; the fetch effect re-runs on change
    let mut attempt = use_signal(|| 0u32);
    let mut can_retry = use_signal(|| false);

    // ─── Fetch and aggregate on mount and on retry ───
    use_effect(move || {
        let attempt = attempt();
        spawn(async move {
            if attempt > 0 {
                log::info!("Retrying poll fetch (attempt {})", attempt + 1);
            }
            let client = match api_config() {
                Ok(config) => BrowserClient::new(config),
                Err(e) => {
                    log::error!("Backend is not configured: {}", e);
                    state.error_msg.set(Some(e.to_string()));
                    state.loading.set(false);
                    return;
                }
            };
            match client.fetch_polls().await {
                Ok(records) => {
                    let series = PollAggregator::default().aggregate(&records);
                    log::info!(
                        "Charting {} dates from {} records ({} warnings)",
                        series.points.len(),
                        records.len(),
                        series.warnings.len()
                    );
                    state.series.set(series);
                }
                Err(e) => {
                    log::error!("Failed to fetch poll records: {}", e);
                    can_retry.set(true);
                    state
                        .error_msg
                        .set(Some(format!("Não foi possível carregar as pesquisas: {}", e)));
                }
            }
            state.loading.set(false);
        });
    });

    // ─── Render the SVG when the data or the legend changes ───
    let chart_candidates = candidates.clone();
    let rendered: Memo<Result<RenderedChart, String>> = use_memo(move || {
        let options = ChartOptions {
            candidates: chart_candidates.clone(),
            visible: (state.visible)(),
            ..ChartOptions::default()
        };
        render_svg(&state.series.read().points, &options).map_err(|e| {
            log::error!("{}", e);
            e.to_string()
        })
    });

    let on_pointer = move |pixel_x: Option<i32>| {
        let index = pixel_x.and_then(|x| match &*rendered.read() {
            Ok(chart) => chart.layout.nearest_point(x),
            Err(_) => None,
        });
        state.hovered.set(index);
    };

    let on_retry = move |_: ()| {
        can_retry.set(false);
        state.error_msg.set(None);
        state.loading.set(true);
        attempt += 1;
    };

    let loading = (state.loading)();
    let error = (state.error_msg)();
    let retry = if can_retry() { Some(EventHandler::new(on_retry)) } else { None };
    let visible = (state.visible)();
    let caption = coverage_caption(&state.series.read());

    let (svg, tooltip, tooltip_x) = match rendered() {
        Ok(chart) => {
            let hovered = (state.hovered)();
            let series = state.series.read();
            let tip = hovered.and_then(|i| {
                let point = series.points.get(i)?;
                let x = *chart.layout.centers.get(i)?;
                Some((tooltip_lines(point, &candidates, visible), x))
            });
            let (lines, x) = tip.unwrap_or_default();
            (chart.svg, lines, x)
        }
        Err(e) => {
            return rsx! {
                ErrorDisplay { message: e }
            };
        }
    };

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 16px; max-width: 840px; margin: 0 auto;",
            ChartHeader {
                title: "Pesquisas de intenção de voto (% dos votos)",
                caption,
            }
            if let Some(err) = error {
                ErrorDisplay { message: err, on_retry: retry }
            }
            if loading {
                LoadingSpinner {}
            } else {
                LegendToggle {
                    name_a: candidates.a.display_name.clone(),
                    name_b: candidates.b.display_name.clone(),
                }
                ChartContainer {
                    id: "{CHART_CONTAINER_ID}",
                    svg,
                    tooltip,
                    tooltip_x,
                    on_pointer,
                }
            }
        }
    }
}
