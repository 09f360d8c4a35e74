//! UI state for the upload page, independent of any rendering layer.
//!
//! - `upload`: the upload state machine and the async driver that feeds it
//! - `notice`: the loading/success/error toast model
//! - `session`: both of the above wired together

pub mod notice;
pub mod session;
pub mod upload;
