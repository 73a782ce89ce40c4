use http::StatusCode;
use voxgate_auth::AuthError;
use voxgate_core::{HttpError, Permission};
use voxgate_ratelimit::RateLimitError;
use voxgate_storage::StorageError;

use crate::engine::EngineError;

/// Failures a synthesis request can surface to the client
///
/// Collaborator errors (directory, counter store, engine, storage) are
/// translated into this taxonomy at the orchestrator boundary; their
/// implementation detail never leaks to the client.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// Request text was empty
    #[error("text must not be empty")]
    EmptyText,

    /// Request text exceeded the configured maximum
    #[error("text exceeds the maximum of {max} characters")]
    TextTooLong {
        /// Configured character cap
        max: usize,
    },

    /// Voice selector not present in the catalog
    #[error("voice not found: {voice_id}")]
    UnknownVoice {
        /// The unrecognized selector
        voice_id: String,
    },

    /// Tenant lacks the capability this operation requires
    #[error("permission '{permission}' required")]
    PermissionDenied {
        /// Missing capability
        permission: Permission,
    },

    /// Credential rejected by the auth gate
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Admission denied for this tenant
    #[error("rate limit exceeded")]
    RateLimited {
        /// Seconds until the binding bucket resets
        retry_after: u64,
    },

    /// The synthesis engine failed
    #[error("synthesis engine error: {0}")]
    Engine(String),

    /// Audio was generated but could not be persisted
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EngineError> for SynthesisError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::UnknownVoice(voice_id) => Self::UnknownVoice { voice_id },
            other => Self::Engine(other.to_string()),
        }
    }
}

impl From<RateLimitError> for SynthesisError {
    fn from(e: RateLimitError) -> Self {
        match e {
            RateLimitError::Exceeded { retry_after } => Self::RateLimited { retry_after },
            other => Self::Internal(anyhow::anyhow!(other)),
        }
    }
}

impl HttpError for SynthesisError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyText | Self::TextTooLong { .. } => StatusCode::BAD_REQUEST,
            Self::UnknownVoice { .. } => StatusCode::NOT_FOUND,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::Auth(auth) => auth.status_code(),
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Engine(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(storage) => storage.status_code(),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::EmptyText | Self::TextTooLong { .. } => "invalid_request_error",
            Self::UnknownVoice { .. } => "not_found_error",
            Self::PermissionDenied { .. } | Self::Auth(_) => "authentication_error",
            Self::RateLimited { .. } => "rate_limit_error",
            Self::Engine(_) => "upstream_error",
            Self::Storage(storage) => storage.error_type(),
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Engine(_) => "speech synthesis failed".to_owned(),
            Self::Internal(_) => "an internal error occurred".to_owned(),
            Self::Storage(storage) => storage.client_message(),
            other => other.to_string(),
        }
    }
}
