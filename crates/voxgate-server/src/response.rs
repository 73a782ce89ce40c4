use axum::response::{IntoResponse, Response};
use http::StatusCode;
use voxgate_core::HttpError;
use voxgate_synthesis::SynthesisError;

/// Adapter rendering domain errors as JSON HTTP responses
///
/// Every failure that reaches the client carries a stable
/// machine-readable kind plus a human-readable message.
pub struct ApiError(pub SynthesisError);

impl From<SynthesisError> for ApiError {
    fn from(e: SynthesisError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = error_body(self.0.status_code(), self.0.error_type(), &self.0.client_message());

        if let SynthesisError::RateLimited { retry_after } = &self.0
            && let Ok(value) = retry_after.to_string().parse()
        {
            response.headers_mut().insert("retry-after", value);
        }

        response
    }
}

/// Build the canonical JSON error body
pub fn error_body(status: StatusCode, error_type: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "error": {
            "type": error_type,
            "message": message,
        }
    });

    (status, axum::Json(body)).into_response()
}
