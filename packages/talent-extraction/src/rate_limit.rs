//! Fixed-window, per-category admission control.
//!
//! Each admission is counted against `(category, floor(now_ms / 60_000))`.
//! Windows are fixed, not sliding: up to twice the nominal rate can pass
//! across a minute boundary. Buckets older than the previous minute are
//! evicted on every check.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::{ExtractionError, Result};

/// Length of one rate window.
pub const WINDOW_MILLIS: i64 = 60_000;

/// Source of wall-clock time for window bucketing.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

type BucketKey = (String, i64);

/// Per-category fixed-window rate limiter.
///
/// Each instance owns its counters; share one via `Arc` between adapters.
pub struct RateLimiter {
    limit_per_minute: u32,
    clock: Arc<dyn Clock>,
    buckets: Mutex<HashMap<BucketKey, u32>>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("limit_per_minute", &self.limit_per_minute)
            .field("tracked_buckets", &self.tracked_buckets())
            .finish()
    }
}

impl RateLimiter {
    /// Create a limiter on the system clock.
    pub fn new(limit_per_minute: u32) -> Self {
        Self::with_clock(limit_per_minute, Arc::new(SystemClock))
    }

    /// Create a limiter reading time from `clock`.
    pub fn with_clock(limit_per_minute: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            limit_per_minute,
            clock,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit_per_minute(&self) -> u32 {
        self.limit_per_minute
    }

    /// Count one admission for `category`, or reject it.
    pub fn admit(&self, category: &str) -> Result<()> {
        let now = self.clock.now_millis();
        let minute = now.div_euclid(WINDOW_MILLIS);

        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        let key = (category.to_string(), minute);
        let count = buckets.get(&key).copied().unwrap_or(0);

        let outcome = if count >= self.limit_per_minute {
            let retry_after_seconds = retry_after_seconds(now, minute);
            debug!(
                category,
                count,
                retry_after_seconds,
                "rate limit reached"
            );
            Err(ExtractionError::RateLimitExceeded {
                category: category.to_string(),
                retry_after_seconds,
            })
        } else {
            buckets.insert(key, count + 1);
            Ok(())
        };

        buckets.retain(|(_, bucket), _| *bucket >= minute - 1);

        outcome
    }

    /// Admissions still available for `category` in the current window.
    pub fn remaining(&self, category: &str) -> u32 {
        let minute = self.clock.now_millis().div_euclid(WINDOW_MILLIS);
        let buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        let used = buckets
            .get(&(category.to_string(), minute))
            .copied()
            .unwrap_or(0);
        self.limit_per_minute.saturating_sub(used)
    }

    /// Number of `(category, minute)` counters currently held.
    pub fn tracked_buckets(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn retry_after_seconds(now: i64, minute: i64) -> u64 {
    let next_window = (minute + 1) * WINDOW_MILLIS;
    let wait_ms = (next_window - now).max(0) as u64;
    wait_ms.div_ceil(1000).max(1)
}
