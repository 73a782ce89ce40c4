use voxgate_config::AuthConfig;
use voxgate_core::TenantContext;

use crate::{
    AuthError,
    directory::{DirectoryClient, DirectoryLookup},
    table::StaticTenantTable,
};

/// Composes credential validation with layered tenant resolution
///
/// The directory is always consulted first so a remotely-revoked key
/// shadows a stale static entry with the same value; if the directory
/// is unreachable the static table still resolves (availability over
/// strict consistency for auth).
pub struct AuthGate {
    directory: Option<DirectoryClient>,
    table: StaticTenantTable,
}

impl AuthGate {
    /// Build the gate from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the directory HTTP client cannot be built
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        let directory = config
            .directory
            .as_ref()
            .map(|directory| DirectoryClient::new(directory, config.default_rate_limit))
            .transpose()?;

        let table = StaticTenantTable::from_config(&config.static_tenants, config.default_rate_limit);

        Ok(Self { directory, table })
    }

    /// Resolve an `Authorization` header value to a tenant context
    ///
    /// # Errors
    ///
    /// Returns the rejection kind when the credential is absent,
    /// malformed, unknown to both sources, or resolves to an inactive
    /// tenant
    pub async fn authenticate(&self, header: Option<&str>) -> Result<TenantContext, AuthError> {
        let header = header.ok_or(AuthError::MissingCredential)?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MalformedCredential)?;

        let resolved = match &self.directory {
            Some(directory) => match directory.lookup(token).await {
                DirectoryLookup::Found(tenant) => Some(tenant),
                DirectoryLookup::NotFound | DirectoryLookup::Unavailable => None,
            },
            None => None,
        };

        let tenant = resolved
            .or_else(|| self.table.resolve(token))
            .ok_or(AuthError::UnknownCredential)?;

        if !tenant.is_active {
            return Err(AuthError::InactiveTenant);
        }

        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use voxgate_config::{AuthConfig, DirectoryConfig, StaticTenantConfig};
    use voxgate_core::{Permission, RateLimitPolicy};

    use super::*;

    fn static_tenant(token: &str, tenant_id: &str, is_active: bool) -> StaticTenantConfig {
        StaticTenantConfig {
            token: SecretString::from(token),
            tenant_id: tenant_id.to_owned(),
            name: tenant_id.to_owned(),
            permissions: vec![Permission::Synthesize, Permission::Voices],
            rate_limit: None,
            is_active,
        }
    }

    fn gate_without_directory() -> AuthGate {
        let config = AuthConfig {
            directory: None,
            static_tenants: vec![
                static_tenant("vg_active_key", "tenant_active", true),
                static_tenant("vg_revoked_key", "tenant_revoked", false),
            ],
            default_rate_limit: RateLimitPolicy {
                per_minute: 60,
                per_hour: 1000,
            },
        };
        AuthGate::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let err = gate_without_directory().authenticate(None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_malformed() {
        let err = gate_without_directory()
            .authenticate(Some("Basic dXNlcjpwYXNz"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredential));
    }

    #[tokio::test]
    async fn empty_token_is_malformed() {
        let err = gate_without_directory().authenticate(Some("Bearer ")).await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredential));
    }

    #[tokio::test]
    async fn static_table_resolves_active_tenant() {
        let tenant = gate_without_directory()
            .authenticate(Some("Bearer vg_active_key"))
            .await
            .unwrap();
        assert_eq!(tenant.tenant_id, "tenant_active");
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let err = gate_without_directory()
            .authenticate(Some("Bearer vg_nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownCredential));
    }

    #[tokio::test]
    async fn inactive_tenant_is_rejected() {
        let err = gate_without_directory()
            .authenticate(Some("Bearer vg_revoked_key"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InactiveTenant));
    }

    #[tokio::test]
    async fn unreachable_directory_falls_back_to_static_table() {
        let config = AuthConfig {
            directory: Some(DirectoryConfig {
                // Nothing listens here; the lookup is a soft miss
                url: "http://127.0.0.1:9".parse().unwrap(),
                service_key: SecretString::from("service-key"),
                tenants_table: "tenants".to_owned(),
                cache_ttl_seconds: 30,
                cache_capacity: 16,
            }),
            static_tenants: vec![static_tenant("vg_local_only", "tenant_local", true)],
            default_rate_limit: RateLimitPolicy {
                per_minute: 60,
                per_hour: 1000,
            },
        };
        let gate = AuthGate::from_config(&config).unwrap();

        let tenant = gate.authenticate(Some("Bearer vg_local_only")).await.unwrap();
        assert_eq!(tenant.tenant_id, "tenant_local");
    }
}
