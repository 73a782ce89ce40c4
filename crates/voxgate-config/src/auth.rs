use secrecy::SecretString;
use serde::Deserialize;
use url::Url;
use voxgate_core::{Permission, RateLimitPolicy};

/// Tenant authentication configuration
///
/// Two tenant sources compose with fallback: the remote tenant directory
/// (queried first) and the static in-process table (local/dev operation and
/// a guaranteed fallback when the directory is down).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Remote tenant directory connection parameters
    #[serde(default)]
    pub directory: Option<DirectoryConfig>,

    /// Pre-provisioned tenants resolved by exact credential match
    #[serde(default)]
    pub static_tenants: Vec<StaticTenantConfig>,

    /// Caps applied when a tenant record carries none of its own
    #[serde(default = "default_rate_limit")]
    pub default_rate_limit: RateLimitPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            directory: None,
            static_tenants: Vec::new(),
            default_rate_limit: default_rate_limit(),
        }
    }
}

/// Remote tenant directory connection parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Base URL of the directory service
    pub url: Url,

    /// Service-role key for directory reads
    pub service_key: SecretString,

    /// Table holding tenant records keyed by credential hash
    #[serde(default = "default_tenants_table")]
    pub tenants_table: String,

    /// Cache TTL in seconds for resolved credentials
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    /// Maximum number of cached credential resolutions
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

/// One pre-provisioned tenant in the static table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticTenantConfig {
    /// Plaintext API credential for this tenant
    pub token: SecretString,
    /// Opaque tenant identifier
    pub tenant_id: String,
    /// Display label
    pub name: String,
    /// Capability tags
    #[serde(default = "default_permissions")]
    pub permissions: Vec<Permission>,
    /// Admission caps; falls back to `auth.default_rate_limit` when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimitPolicy>,
    /// Inactive tenants are always rejected
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_rate_limit() -> RateLimitPolicy {
    RateLimitPolicy {
        per_minute: 60,
        per_hour: 1000,
    }
}

fn default_tenants_table() -> String {
    "tenants".to_string()
}

fn default_cache_ttl() -> u64 {
    30
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_permissions() -> Vec<Permission> {
    vec![Permission::Synthesize, Permission::Voices]
}

#[allow(clippy::missing_const_for_fn)]
fn default_active() -> bool {
    true
}
