use dashmap::DashMap;

/// Sweep the map once it grows past this many live buckets
const SWEEP_THRESHOLD: usize = 4096;

/// In-memory fixed-window counters
///
/// Mirrors the store-side semantics of the Redis backend: counters are
/// keyed by bucket, expire after their TTL, and an expired bucket is
/// never reused for accounting. Suitable for a single gateway instance
/// and for tests.
#[derive(Default)]
pub struct MemoryCounters {
    counters: DashMap<String, Counter>,
}

struct Counter {
    count: u64,
    expires_at: u64,
}

impl MemoryCounters {
    /// Create an empty counter store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a bucket counter, returning the new count
    ///
    /// A counter found past its expiry restarts from zero before the
    /// increment, so stale buckets never double-count.
    pub fn increment(&self, key: &str, ttl: u64, now: u64) -> u64 {
        if self.counters.len() > SWEEP_THRESHOLD {
            self.counters.retain(|_, counter| counter.expires_at > now);
        }

        let mut entry = self.counters.entry(key.to_owned()).or_insert(Counter {
            count: 0,
            expires_at: now + ttl,
        });

        if entry.expires_at <= now {
            entry.count = 0;
            entry.expires_at = now + ttl;
        }

        entry.count += 1;
        entry.count
    }

    /// Read a bucket counter without incrementing it
    #[must_use]
    pub fn peek(&self, key: &str, now: u64) -> u64 {
        self.counters
            .get(key)
            .filter(|counter| counter.expires_at > now)
            .map_or(0, |counter| counter.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_are_sequential() {
        let counters = MemoryCounters::new();
        assert_eq!(counters.increment("t1:m:100", 90, 6000), 1);
        assert_eq!(counters.increment("t1:m:100", 90, 6000), 2);
        assert_eq!(counters.increment("t1:m:100", 90, 6001), 3);
    }

    #[test]
    fn keys_are_independent() {
        let counters = MemoryCounters::new();
        counters.increment("t1:m:100", 90, 6000);
        assert_eq!(counters.increment("t2:m:100", 90, 6000), 1);
    }

    #[test]
    fn expired_bucket_restarts_from_zero() {
        let counters = MemoryCounters::new();
        counters.increment("t1:m:100", 90, 6000);
        counters.increment("t1:m:100", 90, 6000);

        // Past the TTL the old count must not carry over
        assert_eq!(counters.increment("t1:m:100", 90, 6091), 1);
    }

    #[test]
    fn peek_does_not_increment() {
        let counters = MemoryCounters::new();
        counters.increment("t1:h:2", 3660, 6000);
        assert_eq!(counters.peek("t1:h:2", 6000), 1);
        assert_eq!(counters.peek("t1:h:2", 6000), 1);
    }

    #[test]
    fn peek_of_expired_bucket_is_zero() {
        let counters = MemoryCounters::new();
        counters.increment("t1:m:100", 90, 6000);
        assert_eq!(counters.peek("t1:m:100", 6091), 0);
    }
}
