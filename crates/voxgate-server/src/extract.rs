use axum::body::Body;
use http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::response::error_body;

/// Body limit for synthesis requests (64 KiB)
const BODY_LIMIT_BYTES: usize = 64 << 10;

static APPLICATION_JSON: http::HeaderValue = http::HeaderValue::from_static("application/json");

/// Extractor for JSON request bodies with a size limit
pub struct Payload<T>(pub T);

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for Payload<T>
where
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        if parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .is_none_or(|value| value != APPLICATION_JSON)
        {
            return Err(error_body(
                http::StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "invalid_request_error",
                "unsupported Content-Type, expected 'application/json'",
            ));
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
                error_body(
                    http::StatusCode::PAYLOAD_TOO_LARGE,
                    "invalid_request_error",
                    &format!("request body is too large, limit is {BODY_LIMIT_BYTES} bytes"),
                )
            } else {
                error_body(
                    http::StatusCode::BAD_REQUEST,
                    "invalid_request_error",
                    &format!("failed to read request body: {err}"),
                )
            }
        })?;

        let body = serde_json::from_slice::<T>(&bytes).map_err(|e| {
            error_body(
                http::StatusCode::BAD_REQUEST,
                "invalid_request_error",
                &format!("failed to parse request body: {e}"),
            )
        })?;

        Ok(Self(body))
    }
}

/// The raw `Authorization` header value, if any
pub fn credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
