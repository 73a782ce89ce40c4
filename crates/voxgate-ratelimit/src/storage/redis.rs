use crate::error::RateLimitError;

/// Redis-backed fixed-window counters shared across gateway instances
///
/// Increments go through a MULTI/EXEC pipeline so the counter update is
/// atomic at the store; there is no read-then-write window.
#[derive(Clone)]
pub struct RedisCounters {
    client: redis::Client,
}

impl RedisCounters {
    /// Create a new Redis-backed counter store
    pub fn new(url: &str) -> Result<Self, RateLimitError> {
        let client =
            redis::Client::open(url).map_err(|e| RateLimitError::Store(format!("failed to connect to Redis: {e}")))?;

        Ok(Self { client })
    }

    /// Atomically increment the minute and hour buckets
    ///
    /// Each key's TTL is refreshed on every increment; the bucket index
    /// embedded in the key keeps expired windows from being reused.
    pub async fn increment_pair(
        &self,
        minute_key: &str,
        minute_ttl: u64,
        hour_key: &str,
        hour_ttl: u64,
    ) -> Result<(u64, u64), RateLimitError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RateLimitError::Store(format!("failed to get connection: {e}")))?;

        let (minute_count, hour_count): (u64, u64) = redis::pipe()
            .atomic()
            .cmd("INCR")
            .arg(minute_key)
            .cmd("EXPIRE")
            .arg(minute_key)
            .arg(minute_ttl)
            .ignore()
            .cmd("INCR")
            .arg(hour_key)
            .cmd("EXPIRE")
            .arg(hour_key)
            .arg(hour_ttl)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Store(format!("INCR pipeline failed: {e}")))?;

        Ok((minute_count, hour_count))
    }

    /// Read both bucket counters without incrementing them
    pub async fn peek_pair(&self, minute_key: &str, hour_key: &str) -> Result<(u64, u64), RateLimitError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RateLimitError::Store(format!("failed to get connection: {e}")))?;

        let (minute_count, hour_count): (Option<u64>, Option<u64>) = redis::pipe()
            .cmd("GET")
            .arg(minute_key)
            .cmd("GET")
            .arg(hour_key)
            .query_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Store(format!("GET pipeline failed: {e}")))?;

        Ok((minute_count.unwrap_or(0), hour_count.unwrap_or(0)))
    }
}
