use serde::Deserialize;
use url::Url;

/// Admission rate limiting configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Counter store backend
    #[serde(default)]
    pub storage: CounterStorage,
}

/// Counter store backend for admission bookkeeping
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CounterStorage {
    /// In-memory counters (single instance only)
    #[default]
    Memory,
    /// Redis-backed counters, shared across gateway instances
    Redis(RedisConfig),
}

/// Redis connection parameters for the counter store
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: Url,
}
