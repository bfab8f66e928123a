use crate::config::RateLimitConfig;
use dashmap::DashMap;
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct Metrics {
    pub decisions_total: Counter<u64>,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        let meter = global::meter("neblina-server");
        Self {
            decisions_total: meter
                .u64_counter("rate_limit_decisions_total")
                .with_description("Rate limit decisions (allowed/throttled)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// The outcome of a single rate limit check, computed fresh every time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window, including the one just admitted.
    pub remaining: u32,
    /// Unix seconds at which the oldest counted request leaves the window.
    pub reset_time: i64,
}

/// Sliding-window limiter keyed by client, backed by an in-memory map of
/// request timestamps.
///
/// Per-key pruning happens on every check; a full sweep of all buckets runs
/// every `cleanup_interval` checks so abandoned clients do not accumulate.
/// The map's shard locking serializes the read-prune-append step for a key,
/// so two simultaneous requests from one client cannot both slip under the
/// limit.
#[derive(Clone, Debug)]
pub struct RateLimitService {
    store: Arc<DashMap<String, Vec<i64>>>,
    checks: Arc<AtomicU64>,
    limit: u32,
    window_ms: i64,
    cleanup_interval: u64,
    metrics: Metrics,
}

impl RateLimitService {
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            checks: Arc::new(AtomicU64::new(0)),
            limit: config.limit,
            window_ms: i64::try_from(config.window_secs.saturating_mul(1000)).unwrap_or(i64::MAX),
            cleanup_interval: config.cleanup_interval.max(1),
            metrics: Metrics::new(),
        }
    }

    /// Checks whether a request from `client_key` is allowed right now and,
    /// if so, records it.
    pub fn check(&self, client_key: &str) -> RateLimitDecision {
        self.check_at(client_key, now_ms())
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    fn check_at(&self, client_key: &str, now: i64) -> RateLimitDecision {
        let window_start = now - self.window_ms;

        let decision = {
            let mut timestamps = self.store.entry(client_key.to_owned()).or_default();
            timestamps.retain(|&ts| ts > window_start);

            let count = timestamps.len();
            let reset_time = timestamps.first().map_or_else(
                || (now + self.window_ms + 999) / 1000,
                |&oldest| (oldest + self.window_ms + 999) / 1000,
            );

            let allowed = count < self.limit as usize;
            let count = u32::try_from(count).unwrap_or(self.limit);
            let remaining = if allowed { self.limit - count - 1 } else { 0 };

            if allowed {
                timestamps.push(now);
            }

            RateLimitDecision { allowed, remaining, reset_time }
        };

        let status = if decision.allowed { "allowed" } else { "throttled" };
        self.metrics.decisions_total.add(1, &[KeyValue::new("status", status)]);

        let checks = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if checks % self.cleanup_interval == 0 {
            self.sweep(now);
        }

        decision
    }

    /// Drops timestamps older than twice the window from every bucket and
    /// removes buckets left empty.
    fn sweep(&self, now: i64) {
        let cutoff = now - self.window_ms.saturating_mul(2);
        let before = self.store.len();

        self.store.retain(|_, timestamps| {
            timestamps.retain(|&ts| ts > cutoff);
            !timestamps.is_empty()
        });

        let removed = before.saturating_sub(self.store.len());
        if removed > 0 {
            tracing::debug!(removed, "dropped stale rate limit buckets");
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}
