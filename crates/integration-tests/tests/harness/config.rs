//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::PathBuf;

use secrecy::SecretString;
use voxgate_config::{
    AuthConfig, Config, EngineConfig, HealthConfig, LocalStorageConfig, RateLimitConfig, ServerConfig,
    StaticTenantConfig, StorageConfig, StorageStrategy,
};
use voxgate_core::{Permission, RateLimitPolicy};

/// Credential for the active test tenant `tenant_t1`
pub const ACTIVE_KEY: &str = "vg_test_active";
/// Credential for the inactive test tenant `tenant_t2`
pub const INACTIVE_KEY: &str = "vg_test_inactive";
/// Credential for `tenant_t3`, capped at two requests per minute
pub const LIMITED_KEY: &str = "vg_test_limited";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder wired to a mock engine and a temp storage root
    pub fn new(engine_url: &str, storage_root: PathBuf) -> Self {
        let mut limited = tenant(LIMITED_KEY, "tenant_t3", true);
        limited.rate_limit = Some(RateLimitPolicy {
            per_minute: 2,
            per_hour: 100,
        });

        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                auth: AuthConfig {
                    directory: None,
                    static_tenants: vec![
                        tenant(ACTIVE_KEY, "tenant_t1", true),
                        tenant(INACTIVE_KEY, "tenant_t2", false),
                        limited,
                    ],
                    default_rate_limit: RateLimitPolicy {
                        per_minute: 100,
                        per_hour: 1000,
                    },
                },
                rate_limit: RateLimitConfig::default(),
                storage: StorageConfig {
                    strategy: StorageStrategy::Local,
                    remote: None,
                    local: LocalStorageConfig {
                        root: storage_root,
                        public_base_url: None,
                    },
                },
                engine: EngineConfig {
                    base_url: engine_url.parse().expect("valid URL"),
                    api_key: None,
                    max_text_chars: 500,
                    default_language: "en".to_owned(),
                    default_voice: "default".to_owned(),
                    request_timeout_seconds: 10,
                    catalog_ttl_seconds: 300,
                },
                usage: None,
            },
        }
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Set a public base for local retrieval URLs
    pub fn with_public_base(mut self, base: &str) -> Self {
        self.config.storage.local.public_base_url = Some(base.to_owned());
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}

fn tenant(token: &str, tenant_id: &str, is_active: bool) -> StaticTenantConfig {
    StaticTenantConfig {
        token: SecretString::from(token),
        tenant_id: tenant_id.to_owned(),
        name: tenant_id.to_owned(),
        permissions: vec![Permission::Synthesize, Permission::Voices],
        rate_limit: None,
        is_active,
    }
}
