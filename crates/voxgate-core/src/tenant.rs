use serde::{Deserialize, Serialize};

/// Resolved identity for one authenticated request
///
/// Constructed fresh per request by the auth gate and owned by the
/// request-handling call stack. Never cached across requests, so a
/// revocation or quota change takes effect on the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    /// Opaque unique tenant identifier
    pub tenant_id: String,
    /// Display label
    pub name: String,
    /// Capability tags granted to this tenant
    pub permissions: Vec<Permission>,
    /// Admission quota for this tenant
    pub rate_limit: RateLimitPolicy,
    /// Inactive tenants are always rejected
    pub is_active: bool,
}

impl TenantContext {
    /// Whether this tenant holds the given capability
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Capability tags a tenant may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Run text-to-speech synthesis
    Synthesize,
    /// List the voice catalog
    Voices,
    /// Upload reference audio for custom voices
    Upload,
    /// Access operator-level endpoints
    Admin,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Synthesize => "synthesize",
            Self::Voices => "voices",
            Self::Upload => "upload",
            Self::Admin => "admin",
        };
        f.write_str(tag)
    }
}

/// Per-tenant admission caps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitPolicy {
    /// Maximum requests per minute window
    pub per_minute: u32,
    /// Maximum requests per hour window
    pub per_hour: u32,
}
