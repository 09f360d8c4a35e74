//! Backend configuration for the web apps.
//!
//! `API_URL` (and optionally `API_TIMEOUT_SECS`) are read from the
//! environment or a `.env` file when the crate is compiled.

use evc_core::config::{API_TIMEOUT_VAR, API_URL_VAR};
use evc_core::{ApiConfig, ApiError};

pub fn api_config() -> Result<ApiConfig, ApiError> {
    ApiConfig::from_lookup(|key| match key {
        API_URL_VAR => option_env!("API_URL").map(str::to_string),
        API_TIMEOUT_VAR => option_env!("API_TIMEOUT_SECS").map(str::to_string),
        _ => None,
    })
}
