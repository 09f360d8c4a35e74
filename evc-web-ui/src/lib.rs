//! Shared Dioxus components and browser plumbing for EVC web apps.
//!
//! This crate provides:
//! - `browser`: XHR-backed `VoteApi` client, file reading, downloads and timers
//! - `config`: backend configuration baked in at build time
//! - `state`: Reactive app states with Dioxus Signals
//! - `components`: Reusable RSX components (chart frame, toasts, progress, etc.)

pub mod browser;
pub mod components;
pub mod config;
pub mod state;
