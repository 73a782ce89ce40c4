use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Usage log configuration
///
/// Usage records are appended best-effort to a remote table. When this
/// section is absent, recording is disabled and requests are served
/// without any usage bookkeeping.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsageConfig {
    /// Base URL of the usage log service
    pub url: Url,

    /// Service-role key for appends
    pub service_key: SecretString,

    /// Table receiving usage rows
    #[serde(default = "default_table")]
    pub table: String,

    /// How often buffered records are flushed
    #[serde(default = "default_flush_interval")]
    pub flush_interval_seconds: u64,
}

fn default_table() -> String {
    "usage_logs".to_string()
}

fn default_flush_interval() -> u64 {
    10
}
