use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use mini_moka::sync::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use voxgate_config::DirectoryConfig;
use voxgate_core::{Permission, RateLimitPolicy, TenantContext};

/// Outcome of a remote directory lookup
///
/// `Found` includes revoked tenants: a directory row with
/// `is_active = false` is still a match and must shadow any static
/// entry with the same token. `Unavailable` is a soft miss — the
/// caller falls back to the static table.
#[derive(Debug)]
pub enum DirectoryLookup {
    /// The directory holds a record for this credential
    Found(TenantContext),
    /// The directory is reachable and has no record for this credential
    NotFound,
    /// The directory could not be queried (connectivity, server error)
    Unavailable,
}

/// Tenant record as stored in the directory table
///
/// Permissions arrive as free-form tags; unknown tags are ignored so a
/// directory schema addition never breaks resolution.
#[derive(Debug, Deserialize)]
struct TenantRow {
    #[serde(alias = "id")]
    tenant_id: String,
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    permissions: Option<Vec<String>>,
    #[serde(default)]
    rate_limit_minute: Option<u32>,
    #[serde(default)]
    rate_limit_hour: Option<u32>,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_name() -> String {
    "Tenant".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_active() -> bool {
    true
}

/// Resolves credentials against the remote tenant directory
///
/// The raw token never leaves the process: lookups are keyed by its
/// SHA-256 hex digest. Resolutions are cached for the configured TTL.
#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: url::Url,
    service_key: SecretString,
    table: String,
    default_rate_limit: RateLimitPolicy,
    cache: Cache<String, Arc<TenantContext>>,
}

impl DirectoryClient {
    /// Create a new directory client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &DirectoryConfig, default_rate_limit: RateLimitPolicy) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(5)).build()?;

        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .max_capacity(config.cache_capacity)
            .build();

        Ok(Self {
            http,
            base_url: config.url.clone(),
            service_key: config.service_key.clone(),
            table: config.tenants_table.clone(),
            default_rate_limit,
            cache,
        })
    }

    /// Resolve a raw credential to a tenant record
    pub async fn lookup(&self, raw_token: &str) -> DirectoryLookup {
        let key_hash = sha256_hex(raw_token);

        if let Some(cached) = self.cache.get(&key_hash) {
            return DirectoryLookup::Found((*cached).clone());
        }

        let Ok(url) = self.base_url.join(&format!("rest/v1/{}", self.table)) else {
            tracing::warn!(table = %self.table, "invalid tenant directory URL");
            return DirectoryLookup::Unavailable;
        };

        let hash_filter = format!("eq.{key_hash}");
        let response = self
            .http
            .get(url)
            .query(&[("select", "*"), ("api_key_hash", hash_filter.as_str()), ("limit", "1")])
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "tenant directory unreachable, falling back to static table");
                return DirectoryLookup::Unavailable;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "tenant directory returned an error");
            return DirectoryLookup::Unavailable;
        }

        let rows: Vec<TenantRow> = match response.json().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse tenant directory response");
                return DirectoryLookup::Unavailable;
            }
        };

        let Some(row) = rows.into_iter().next() else {
            return DirectoryLookup::NotFound;
        };

        let tenant = self.context_from(row);
        self.cache.insert(key_hash, Arc::new(tenant.clone()));

        DirectoryLookup::Found(tenant)
    }

    /// Remove a cached credential resolution (e.g. after revocation)
    pub fn invalidate(&self, raw_token: &str) {
        self.cache.invalidate(&sha256_hex(raw_token));
    }

    fn context_from(&self, row: TenantRow) -> TenantContext {
        let permissions = row.permissions.map_or_else(
            || vec![Permission::Synthesize, Permission::Voices],
            |tags| tags.iter().filter_map(|tag| parse_permission(tag)).collect(),
        );

        TenantContext {
            tenant_id: row.tenant_id,
            name: row.name,
            permissions,
            rate_limit: RateLimitPolicy {
                per_minute: row.rate_limit_minute.unwrap_or(self.default_rate_limit.per_minute),
                per_hour: row.rate_limit_hour.unwrap_or(self.default_rate_limit.per_hour),
            },
            is_active: row.is_active,
        }
    }
}

fn parse_permission(tag: &str) -> Option<Permission> {
    match tag {
        "synthesize" => Some(Permission::Synthesize),
        "voices" => Some(Permission::Voices),
        "upload" => Some(Permission::Upload),
        "admin" => Some(Permission::Admin),
        other => {
            tracing::debug!(permission = %other, "ignoring unknown permission tag");
            None
        }
    }
}

/// Compute the SHA-256 hex digest of a string
fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest {
        // Writing hex to a String is infallible
        write!(hex, "{byte:02x}").unwrap();
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn unknown_permission_tags_are_ignored() {
        assert_eq!(parse_permission("synthesize"), Some(Permission::Synthesize));
        assert_eq!(parse_permission("metrics"), None);
    }
}
