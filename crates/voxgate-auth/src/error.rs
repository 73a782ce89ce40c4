use http::StatusCode;
use voxgate_core::HttpError;

/// Admission decision failures from the auth gate
///
/// Every rejection kind is a named variant so callers handle the full
/// set statically. Directory unavailability is deliberately absent: it
/// is a degraded-mode event handled by fallback, not a rejection.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header was present
    #[error("missing API credential")]
    MissingCredential,

    /// The header did not match the `Bearer <token>` scheme
    #[error("malformed API credential")]
    MalformedCredential,

    /// Neither the directory nor the static table knows this token
    #[error("unknown API credential")]
    UnknownCredential,

    /// The credential resolved to a deactivated tenant
    #[error("tenant is inactive")]
    InactiveTenant,
}

impl HttpError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential | Self::MalformedCredential | Self::UnknownCredential => StatusCode::UNAUTHORIZED,
            Self::InactiveTenant => StatusCode::FORBIDDEN,
        }
    }

    fn error_type(&self) -> &str {
        "authentication_error"
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
