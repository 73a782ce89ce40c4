use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Audio storage configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Preferred storage strategy
    #[serde(default)]
    pub strategy: StorageStrategy,

    /// Remote object store parameters (required for the remote strategy)
    #[serde(default)]
    pub remote: Option<RemoteStorageConfig>,

    /// Local filesystem parameters (fallback and default)
    #[serde(default)]
    pub local: LocalStorageConfig,
}

/// Storage strategy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageStrategy {
    /// Tenant-namespaced files under a configured root
    #[default]
    Local,
    /// Hosted object store with time-limited signed URLs
    Remote,
}

/// Remote object store connection parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteStorageConfig {
    /// Base URL of the object store service
    pub url: Url,

    /// Service-role key for uploads and URL signing
    pub service_key: SecretString,

    /// Bucket holding generated audio
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Validity window of signed retrieval URLs
    #[serde(default = "default_signed_url_expiry")]
    pub signed_url_expiry_seconds: u64,
}

/// Local filesystem storage parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalStorageConfig {
    /// Directory under which tenant subdirectories are created
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Public base combined with relative retrieval paths, when fronted
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            public_base_url: None,
        }
    }
}

fn default_bucket() -> String {
    "tts-audio".to_string()
}

fn default_signed_url_expiry() -> u64 {
    3600
}

fn default_root() -> PathBuf {
    PathBuf::from("/tmp/voxgate-audio")
}
