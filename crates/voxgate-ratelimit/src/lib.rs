#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
mod limiter;
pub mod storage;
mod window;

pub use error::RateLimitError;
pub use limiter::{TenantLimiter, WindowUsage};

use voxgate_config::RateLimitConfig;

/// Create a tenant admission limiter from configuration
pub fn create_limiter(config: &RateLimitConfig) -> Result<TenantLimiter, RateLimitError> {
    TenantLimiter::from_config(config)
}
