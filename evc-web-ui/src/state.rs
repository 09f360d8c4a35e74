//! Application state managed via Dioxus context.
//!
//! Each app bundles its reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context`.

use dioxus::prelude::*;
use evc_chart::SeriesVisibility;
use evc_data::polls::AggregatedSeries;
use evc_flow::session::UploadSession;

/// State of the poll trend chart page.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Whether the poll records are still being fetched
    pub loading: Signal<bool>,
    /// Error message if something went wrong
    pub error_msg: Signal<Option<String>>,
    pub series: Signal<AggregatedSeries>,
    /// Legend toggles
    pub visible: Signal<SeriesVisibility>,
    /// Index of the point under the pointer
    pub hovered: Signal<Option<usize>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            series: Signal::new(AggregatedSeries::default()),
            visible: Signal::new(SeriesVisibility::default()),
            hovered: Signal::new(None),
        }
    }
}

/// State of the vote upload page.
#[derive(Clone, Copy)]
pub struct UploadAppState {
    pub session: Signal<UploadSession>,
    /// The browser file behind the current selection
    pub file: Signal<Option<web_sys::File>>,
}

impl UploadAppState {
    pub fn new() -> Self {
        Self {
            session: Signal::new(UploadSession::default()),
            file: Signal::new(None),
        }
    }
}
