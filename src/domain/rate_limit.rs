//! Rate limiting contract
//!
//! The counter store is injected into the API state so the extraction pipeline
//! itself never touches shared mutable state.

use async_trait::async_trait;
use serde::Deserialize;

#[cfg(test)]
use mockall::automock;

/// Sliding window rate limit settings
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Maximum requests per client inside one window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    100
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

impl RateLimitConfig {
    pub fn new(window_secs: u64, max_requests: u32) -> Self {
        Self {
            enabled: true,
            window_secs,
            max_requests,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Seconds until the oldest request leaves the window (0 when allowed)
    pub retry_after_secs: u64,
}

impl RateLimitDecision {
    pub fn allow(limit: u32, remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            limit,
            retry_after_secs: 0,
        }
    }

    pub fn deny(limit: u32, retry_after_secs: u64) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            limit,
            retry_after_secs,
        }
    }
}

/// Per-client request counter store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Check the client's window and record the request when it is allowed
    async fn check_and_record(&self, client: &str) -> RateLimitDecision;
}
