use thiserror::Error;

/// Errors raised while talking to the vote-count backend.
///
/// `Network`, `Status` and `Timeout` form the network class: the request
/// did not produce a usable 2xx response. `UnexpectedResponse` means the
/// backend answered 2xx with a payload of the wrong shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("request timed out")]
    Timeout,

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not read upload: {0}")]
    Io(String),
}

impl ApiError {
    /// True for transport failures and non-2xx answers.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::Status { .. } | ApiError::Timeout
        )
    }
}

#[cfg(feature = "api")]
impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ApiError::Timeout
        } else if let Some(status) = value.status() {
            ApiError::Status {
                status: status.as_u16(),
                url: value.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if value.is_decode() {
            ApiError::UnexpectedResponse(value.to_string())
        } else {
            ApiError::Network(value.to_string())
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(value: std::io::Error) -> Self {
        ApiError::Io(value.to_string())
    }
}
