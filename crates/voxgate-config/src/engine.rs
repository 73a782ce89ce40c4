use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Synthesis engine configuration
///
/// The engine is an external collaborator: given text and a voice
/// selection it produces audio bytes or an audio byte stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Base URL of the synthesis engine service
    pub base_url: Url,

    /// API key forwarded to the engine
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Maximum accepted input length in characters
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// Language applied when a request carries none
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Voice applied when a request carries none
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Per-request timeout for engine calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// How long the voice catalog is cached
    #[serde(default = "default_catalog_ttl")]
    pub catalog_ttl_seconds: u64,
}

fn default_max_text_chars() -> usize {
    5000
}

fn default_language() -> String {
    "en".to_string()
}

fn default_voice() -> String {
    "default".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_catalog_ttl() -> u64 {
    300
}
