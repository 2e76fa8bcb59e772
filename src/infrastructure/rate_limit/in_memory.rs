//! In-memory rate limiter
//!
//! Sliding window rate limiting keyed by client identity.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::rate_limit::{RateLimitConfig, RateLimitDecision, RateLimitStore};

/// Rate limiter holding per-client request timestamps
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    /// Per-client request timestamps, oldest first
    records: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    /// Cleanup interval
    cleanup_interval: Duration,
    /// Last cleanup time
    last_cleanup: Arc<RwLock<Instant>>,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: Arc::new(RwLock::new(HashMap::new())),
            cleanup_interval: Duration::from_secs(300),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.config.window_secs)
    }

    fn decide(&self, timestamps: Option<&Vec<Instant>>, now: Instant) -> RateLimitDecision {
        let limit = self.config.max_requests;
        let window_start = now.checked_sub(self.window()).unwrap_or(now);

        let in_window: Vec<Instant> = timestamps
            .map(|t| t.iter().copied().filter(|t| *t > window_start).collect())
            .unwrap_or_default();

        let count = in_window.len() as u32;

        if count >= limit {
            let retry_after = in_window
                .iter()
                .min()
                .map(|oldest| {
                    let remaining = self.window().saturating_sub(now.duration_since(*oldest));
                    remaining.as_secs_f64().ceil() as u64
                })
                .unwrap_or(self.config.window_secs)
                .max(1);

            return RateLimitDecision::deny(limit, retry_after);
        }

        RateLimitDecision::allow(limit, limit.saturating_sub(count + 1))
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if should_cleanup {
            let mut last = self.last_cleanup.write().await;
            *last = Instant::now();

            let now = Instant::now();
            let cutoff = now.checked_sub(self.window()).unwrap_or(now);

            let mut records = self.records.write().await;

            for timestamps in records.values_mut() {
                timestamps.retain(|t| *t > cutoff);
            }

            records.retain(|_, v| !v.is_empty());
        }
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimiter {
    async fn check_and_record(&self, client: &str) -> RateLimitDecision {
        if !self.config.enabled {
            let limit = self.config.max_requests;
            return RateLimitDecision::allow(limit, limit);
        }

        self.maybe_cleanup().await;

        let now = Instant::now();
        let mut records = self.records.write().await;

        let decision = self.decide(records.get(client), now);

        if decision.allowed {
            let window_start = now.checked_sub(self.window()).unwrap_or(now);
            let timestamps = records.entry(client.to_string()).or_default();
            timestamps.retain(|t| *t > window_start);
            timestamps.push(now);
        }

        decision
    }
}
