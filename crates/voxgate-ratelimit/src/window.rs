use std::time::{SystemTime, UNIX_EPOCH};

/// Width of the minute bucket in seconds
pub const MINUTE_WIDTH: u64 = 60;
/// Width of the hour bucket in seconds
pub const HOUR_WIDTH: u64 = 3600;

/// TTL slack so a bucket outlives its window and then self-cleans
const BUCKET_SLACK: u64 = 30;

/// Bucket indices and reset distances for one instant
#[derive(Debug, Clone, Copy)]
pub struct Windows {
    /// Index of the current minute bucket (`floor(now / 60)`)
    pub minute_bucket: u64,
    /// Index of the current hour bucket (`floor(now / 3600)`)
    pub hour_bucket: u64,
    /// Seconds until the minute bucket rolls over
    pub minute_reset: u64,
    /// Seconds until the hour bucket rolls over
    pub hour_reset: u64,
}

/// Compute the window buckets for a unix timestamp
pub const fn windows_at(now: u64) -> Windows {
    Windows {
        minute_bucket: now / MINUTE_WIDTH,
        hour_bucket: now / HOUR_WIDTH,
        minute_reset: MINUTE_WIDTH - now % MINUTE_WIDTH,
        hour_reset: HOUR_WIDTH - now % HOUR_WIDTH,
    }
}

/// TTL applied to minute-bucket counter keys
pub const fn minute_ttl() -> u64 {
    MINUTE_WIDTH + BUCKET_SLACK
}

/// TTL applied to hour-bucket counter keys
pub const fn hour_ttl() -> u64 {
    HOUR_WIDTH + BUCKET_SLACK
}

/// Current unix timestamp in seconds
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
