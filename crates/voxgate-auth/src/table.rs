use std::collections::HashMap;

use secrecy::ExposeSecret;
use voxgate_config::StaticTenantConfig;
use voxgate_core::{RateLimitPolicy, TenantContext};

/// Read-only in-process tenant table
///
/// Resolves credentials by exact plaintext match against the small set
/// of pre-provisioned keys from configuration. Exists for local/dev
/// operation and as the guaranteed fallback when the directory is down.
/// Built once at construction and injected into the auth gate; never
/// mutated at runtime.
pub struct StaticTenantTable {
    entries: HashMap<String, TenantContext>,
}

impl StaticTenantTable {
    /// Build the table from configuration
    #[must_use]
    pub fn from_config(tenants: &[StaticTenantConfig], default_rate_limit: RateLimitPolicy) -> Self {
        let entries = tenants
            .iter()
            .map(|tenant| {
                let context = TenantContext {
                    tenant_id: tenant.tenant_id.clone(),
                    name: tenant.name.clone(),
                    permissions: tenant.permissions.clone(),
                    rate_limit: tenant.rate_limit.unwrap_or(default_rate_limit),
                    is_active: tenant.is_active,
                };
                (tenant.token.expose_secret().to_owned(), context)
            })
            .collect();

        Self { entries }
    }

    /// Resolve a plaintext credential, inactive tenants included
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<TenantContext> {
        self.entries.get(token).cloned()
    }
}
