use thiserror::Error;

/// Why a single fetch failed. Every variant is terminal for that fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidRequestUrl { url: String, reason: String },

    #[error("Weather request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("Weather provider returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Failed to decode weather response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidRequestUrl { .. } => "invalid_request_url",
            FetchError::Transport(_) => "transport",
            FetchError::HttpStatus { .. } => "http_status",
            FetchError::Decode(_) => "decode",
        }
    }
}
