use http::StatusCode;
use thiserror::Error;
use voxgate_core::HttpError;

/// Rate limiting errors
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Configuration error
    #[error("rate limit configuration error: {0}")]
    Config(String),

    /// Counter store connection or command error
    #[error("counter store error: {0}")]
    Store(String),

    /// Admission denied for this tenant
    #[error("rate limit exceeded")]
    Exceeded {
        /// Seconds until the binding bucket resets
        retry_after: u64,
    },
}

impl HttpError for RateLimitError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Exceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Config(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Exceeded { .. } => "rate_limit_error",
            Self::Config(_) | Self::Store(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Exceeded { retry_after } => format!("rate limit exceeded, retry after {retry_after}s"),
            Self::Config(_) | Self::Store(_) => "an internal error occurred".to_owned(),
        }
    }
}
