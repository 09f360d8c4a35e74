//! Data processing for poll records and vote tallies.
//!
//! This crate turns backend payloads into the shapes the chart and the
//! spreadsheet need:
//! - `polls`: poll records → one series point per display date
//! - `sheets`: aggregated result → spreadsheet rows, in backend order

pub mod polls;
pub mod sheets;
