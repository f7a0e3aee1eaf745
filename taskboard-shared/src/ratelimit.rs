/// Fixed-window rate limiter
///
/// Counts requests per client inside fixed time windows. Each route declares
/// a [`RateLimitPolicy`]; counters are keyed by policy name *and* client key,
/// so two policies applied to the same client never share a counter.
///
/// # Algorithm
///
/// - First request for a key, or `now > window_reset_at`: reset
///   `count = 1`, `window_reset_at = now + window`, admit.
/// - Otherwise increment `count` and admit iff `count <= max`.
///
/// Rejections are values, not errors. The HTTP layer turns them into
/// `429 Too Many Requests`.
///
/// # Example
///
/// ```
/// use taskboard_shared::clock::ManualClock;
/// use taskboard_shared::ratelimit::{RateLimiter, RateLimitPolicy};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let limiter = RateLimiter::new(Arc::new(ManualClock::default()));
/// let policy = RateLimitPolicy::new("login", 1_000, 2);
///
/// assert!(limiter.admit("10.0.0.1", &policy).await.allowed);
/// assert!(limiter.admit("10.0.0.1", &policy).await.allowed);
/// assert!(!limiter.admit("10.0.0.1", &policy).await.allowed);
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::clock::SharedClock;

/// Admission policy for a route or operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Name used to isolate this policy's counters
    pub name: &'static str,

    /// Window length in milliseconds
    pub window_ms: u64,

    /// Maximum admitted requests per window
    pub max: u32,
}

impl RateLimitPolicy {
    /// Public reads: 100 requests per minute
    pub const READ: RateLimitPolicy = RateLimitPolicy::new("read", 60_000, 100);

    /// Authenticated writes: 50 requests per minute
    pub const WRITE: RateLimitPolicy = RateLimitPolicy::new("write", 60_000, 50);

    /// Comment creation: 30 requests per minute
    pub const COMMENT_WRITE: RateLimitPolicy = RateLimitPolicy::new("comment-write", 60_000, 30);

    /// Bulk user deletion: 20 requests per minute
    pub const BULK_DELETE: RateLimitPolicy = RateLimitPolicy::new("bulk-delete", 60_000, 20);

    /// Manual notifications: 50 requests per minute
    pub const NOTIFY: RateLimitPolicy = RateLimitPolicy::new("notify", 60_000, 50);

    /// Creates a policy
    pub const fn new(name: &'static str, window_ms: u64, max: u32) -> Self {
        Self {
            name,
            window_ms,
            max,
        }
    }

    fn window(&self) -> Duration {
        Duration::milliseconds(self.window_ms as i64)
    }
}

/// Per-key counter state
#[derive(Debug, Clone, Copy)]
struct Counter {
    count: u32,
    window_reset_at: DateTime<Utc>,
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Whether the request may proceed
    pub allowed: bool,

    /// Policy maximum
    pub limit: u32,

    /// Requests left in the current window
    pub remaining: u32,

    /// When the current window ends
    pub reset_at: DateTime<Utc>,
}

impl Admission {
    /// Whole seconds until the window resets, at least 1
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_at - now).num_milliseconds().max(0) as u64;
        millis.div_ceil(1000).max(1)
    }
}

/// Fixed-window counter map
///
/// The map is owned exclusively by the limiter. Each admission takes the
/// lock once, with no await between reading and writing a counter.
pub struct RateLimiter {
    clock: SharedClock,
    counters: Mutex<HashMap<(&'static str, String), Counter>>,
}

impl RateLimiter {
    /// Creates an empty limiter reading time from `clock`
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Counts a request from `client_key` against `policy`
    pub async fn admit(&self, client_key: &str, policy: &RateLimitPolicy) -> Admission {
        let now = self.clock.now();
        let mut counters = self.counters.lock().await;

        let counter = counters
            .entry((policy.name, client_key.to_string()))
            .and_modify(|c| {
                if now > c.window_reset_at {
                    c.count = 1;
                    c.window_reset_at = now + policy.window();
                } else {
                    c.count = c.count.saturating_add(1);
                }
            })
            .or_insert(Counter {
                count: 1,
                window_reset_at: now + policy.window(),
            });

        let allowed = counter.count <= policy.max;
        if !allowed {
            tracing::debug!(
                policy = policy.name,
                client = client_key,
                count = counter.count,
                "Rate limit exceeded"
            );
        }

        Admission {
            allowed,
            limit: policy.max,
            remaining: policy.max.saturating_sub(counter.count),
            reset_at: counter.window_reset_at,
        }
    }

    /// Drops counters whose window has elapsed, returning how many went away
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut counters = self.counters.lock().await;
        let before = counters.len();
        counters.retain(|_, c| now <= c.window_reset_at);
        before - counters.len()
    }

    /// Number of live counters
    pub async fn len(&self) -> usize {
        self.counters.lock().await.len()
    }

    /// Whether no counters are held
    pub async fn is_empty(&self) -> bool {
        self.counters.lock().await.is_empty()
    }

    /// Current time according to the limiter's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
