use serde::Serialize;

/// Tenant id used when a request fails before a tenant is known
pub const SENTINEL_TENANT: &str = "unknown";

/// One append-only audit/billing row per completed or failed request
///
/// Character and byte counts are measured values, never estimates.
/// `latency_ms` runs from the admission decision to response
/// completion so the metric is comparable across auth backends.
#[derive(Debug, Clone, Serialize)]
pub struct UsageRecord {
    /// Tenant the request was attributed to
    pub tenant_id: String,
    /// Unique request identifier
    pub request_id: String,
    /// Length of the dispatched input text in characters
    pub input_chars: u64,
    /// Bytes of audio produced
    pub audio_bytes: u64,
    /// Latency from admission decision to response completion
    pub latency_ms: u64,
    /// Whether the response was streamed
    pub streaming: bool,
    /// Voice used for synthesis
    pub voice_id: String,
    /// Language used for synthesis
    pub language: String,
    /// Endpoint that served the request
    pub endpoint: String,
    /// Failure description, absent on success
    pub error: Option<String>,
}
