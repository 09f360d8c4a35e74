//! Reusable Dioxus RSX components for EVC web apps.

mod chart_container;
mod chart_header;
mod error_display;
mod legend_toggle;
mod loading_spinner;
mod progress_bar;
mod toast_view;

pub use chart_container::ChartContainer;
pub use chart_header::{coverage_caption, ChartHeader};
pub use error_display::ErrorDisplay;
pub use legend_toggle::LegendToggle;
pub use loading_spinner::LoadingSpinner;
pub use progress_bar::ProgressBar;
pub use toast_view::ToastView;
