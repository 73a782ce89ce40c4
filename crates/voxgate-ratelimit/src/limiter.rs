use voxgate_config::{CounterStorage, RateLimitConfig};
use voxgate_core::TenantContext;

use crate::{
    error::RateLimitError,
    storage::{memory::MemoryCounters, redis::RedisCounters},
    window::{self, Windows},
};

/// Current window counters for one tenant
#[derive(Debug, Clone, Copy)]
pub struct WindowUsage {
    /// Requests counted in the current minute bucket
    pub minute_count: u64,
    /// Requests counted in the current hour bucket
    pub hour_count: u64,
}

/// Per-tenant admission limiter over a shared counter store
///
/// Every admission attempt increments both buckets, denied or not, so
/// a tenant is not rewarded for hammering past its cap. If the counter
/// store is unreachable the limiter fails open: an infrastructure
/// outage must not block all traffic.
pub struct TenantLimiter {
    store: CounterStore,
}

enum CounterStore {
    Memory(MemoryCounters),
    Redis(RedisCounters),
}

impl TenantLimiter {
    /// Create from configuration
    pub fn from_config(config: &RateLimitConfig) -> Result<Self, RateLimitError> {
        let store = match &config.storage {
            CounterStorage::Memory => CounterStore::Memory(MemoryCounters::new()),
            CounterStorage::Redis(redis_config) => CounterStore::Redis(RedisCounters::new(redis_config.url.as_str())?),
        };

        Ok(Self { store })
    }

    /// Admit or deny a request for this tenant
    ///
    /// # Errors
    ///
    /// Returns `RateLimitError::Exceeded` with a retry-after hint when
    /// either bucket is over its cap. Counter store failures are
    /// logged as degraded-mode events and the request is admitted.
    pub async fn admit(&self, tenant: &TenantContext) -> Result<(), RateLimitError> {
        let now = window::now_unix();
        let windows = window::windows_at(now);
        let (minute_key, hour_key) = bucket_keys(&tenant.tenant_id, &windows);

        let counts = match &self.store {
            CounterStore::Memory(counters) => Ok((
                counters.increment(&minute_key, window::minute_ttl(), now),
                counters.increment(&hour_key, window::hour_ttl(), now),
            )),
            CounterStore::Redis(counters) => {
                counters
                    .increment_pair(&minute_key, window::minute_ttl(), &hour_key, window::hour_ttl())
                    .await
            }
        };

        let (minute_count, hour_count) = match counts {
            Ok(counts) => counts,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    tenant_id = %tenant.tenant_id,
                    "counter store unreachable, admitting request (fail open)"
                );
                return Ok(());
            }
        };

        let minute_over = minute_count > u64::from(tenant.rate_limit.per_minute);
        let hour_over = hour_count > u64::from(tenant.rate_limit.per_hour);

        if minute_over || hour_over {
            // Waiting out the minute is pointless while the hour bucket
            // is exhausted, so the longer reset wins.
            let retry_after = if hour_over { windows.hour_reset } else { windows.minute_reset };

            return Err(RateLimitError::Exceeded {
                retry_after: retry_after.max(1),
            });
        }

        Ok(())
    }

    /// Read the tenant's current window counters without incrementing
    ///
    /// Counter store failures degrade to zero counts with a warning.
    pub async fn usage(&self, tenant_id: &str) -> WindowUsage {
        let now = window::now_unix();
        let windows = window::windows_at(now);
        let (minute_key, hour_key) = bucket_keys(tenant_id, &windows);

        let counts = match &self.store {
            CounterStore::Memory(counters) => {
                Ok((counters.peek(&minute_key, now), counters.peek(&hour_key, now)))
            }
            CounterStore::Redis(counters) => counters.peek_pair(&minute_key, &hour_key).await,
        };

        match counts {
            Ok((minute_count, hour_count)) => WindowUsage {
                minute_count,
                hour_count,
            },
            Err(e) => {
                tracing::warn!(error = %e, %tenant_id, "counter store unreachable, reporting zero usage");
                WindowUsage {
                    minute_count: 0,
                    hour_count: 0,
                }
            }
        }
    }
}

fn bucket_keys(tenant_id: &str, windows: &Windows) -> (String, String) {
    (
        format!("voxgate:ratelimit:{tenant_id}:m:{}", windows.minute_bucket),
        format!("voxgate:ratelimit:{tenant_id}:h:{}", windows.hour_bucket),
    )
}
