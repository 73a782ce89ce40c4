#![allow(clippy::must_use_candidate)]

pub mod auth;
pub mod engine;
mod env;
pub mod health;
mod loader;
pub mod rate_limit;
pub mod server;
pub mod storage;
pub mod usage;

use serde::Deserialize;

pub use auth::*;
pub use engine::*;
pub use health::*;
pub use rate_limit::*;
pub use server::*;
pub use storage::*;
pub use usage::*;

/// Top-level voxgate configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Tenant authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Admission rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Audio storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Synthesis engine configuration
    pub engine: EngineConfig,
    /// Usage log configuration
    #[serde(default)]
    pub usage: Option<UsageConfig>,
}
