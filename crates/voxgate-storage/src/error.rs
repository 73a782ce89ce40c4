use http::StatusCode;
use thiserror::Error;
use voxgate_core::HttpError;

/// Audio storage errors
///
/// Persist failures stay distinct from synthesis failures: audio that
/// was generated but could not be stored is reported as exactly that.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object key component failed validation
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// No stored object under this tenant and id
    #[error("audio file not found")]
    NotFound,

    /// Direct retrieval is unavailable; the signed URL is the capability
    #[error("direct file serving not available with remote storage, use signed URLs")]
    SignedOnly,

    /// Remote store initialization failed
    #[error("remote storage initialization failed: {0}")]
    Init(String),

    /// Upload to the remote store failed
    #[error("audio upload failed: {0}")]
    Upload(String),

    /// Signed URL issuance failed
    #[error("signed URL request failed: {0}")]
    Sign(String),

    /// Local filesystem error
    #[error("local storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl HttpError for StorageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidKey(_) | Self::SignedOnly => StatusCode::BAD_REQUEST,
            Self::Init(_) | Self::Upload(_) | Self::Sign(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::NotFound => "not_found_error",
            Self::InvalidKey(_) | Self::SignedOnly => "invalid_request_error",
            Self::Init(_) | Self::Upload(_) | Self::Sign(_) | Self::Io(_) => "storage_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Init(_) | Self::Upload(_) | Self::Sign(_) | Self::Io(_) => {
                "audio was generated but could not be stored".to_owned()
            }
            other => other.to_string(),
        }
    }
}
