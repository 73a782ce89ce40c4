use std::collections::HashSet;
use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, StorageStrategy};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no tenant source is configured, admission caps
    /// are zero, or the selected storage strategy is missing its parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_auth()?;
        self.validate_storage()?;
        self.validate_engine()?;
        Ok(())
    }

    /// Ensure at least one tenant source exists and tokens are sane
    fn validate_auth(&self) -> anyhow::Result<()> {
        if self.auth.directory.is_none() && self.auth.static_tenants.is_empty() {
            anyhow::bail!("at least one tenant source must be configured (auth.directory or auth.static_tenants)");
        }

        if self.auth.default_rate_limit.per_minute == 0 || self.auth.default_rate_limit.per_hour == 0 {
            anyhow::bail!("auth.default_rate_limit caps must be greater than 0");
        }

        let mut seen = HashSet::new();
        for tenant in &self.auth.static_tenants {
            let token = tenant.token.expose_secret();
            if token.is_empty() {
                anyhow::bail!("static tenant '{}' has an empty token", tenant.tenant_id);
            }
            if !seen.insert(token.to_owned()) {
                anyhow::bail!("duplicate token in auth.static_tenants (tenant '{}')", tenant.tenant_id);
            }
            if let Some(policy) = tenant.rate_limit
                && (policy.per_minute == 0 || policy.per_hour == 0)
            {
                anyhow::bail!("static tenant '{}' has a zero rate-limit cap", tenant.tenant_id);
            }
        }

        Ok(())
    }

    /// Ensure the selected storage strategy has its parameters
    fn validate_storage(&self) -> anyhow::Result<()> {
        if self.storage.strategy == StorageStrategy::Remote {
            let Some(ref remote) = self.storage.remote else {
                anyhow::bail!("storage.strategy = \"remote\" requires a [storage.remote] section");
            };
            if remote.signed_url_expiry_seconds == 0 {
                anyhow::bail!("storage.remote.signed_url_expiry_seconds must be greater than 0");
            }
        }

        Ok(())
    }

    /// Validate synthesis engine limits
    fn validate_engine(&self) -> anyhow::Result<()> {
        if self.engine.max_text_chars == 0 {
            anyhow::bail!("engine.max_text_chars must be greater than 0");
        }

        Ok(())
    }
}
