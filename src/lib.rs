//! Text Extraction Gateway
//!
//! A single HTTP endpoint that accepts a file by URL, base64, byte array or
//! multipart upload, classifies it by content and returns its text or a
//! structured rejection.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::RateLimitStore;
use infrastructure::http::HttpFetcher;
use infrastructure::rate_limit::InMemoryRateLimiter;
use infrastructure::services::ExtractionService;
use tracing::info;

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let fetcher = HttpFetcher::new(Duration::from_secs(config.extraction.download_timeout_secs))?;
    let service =
        ExtractionService::from_config(&config.extraction.pipeline_config(), Arc::new(fetcher));

    let rate_limiter: Arc<dyn RateLimitStore> =
        Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));

    info!(
        max_file_size = config.extraction.max_file_size,
        max_text_length = config.extraction.max_text_length,
        rate_limit_enabled = config.rate_limit.enabled,
        require_api_key = config.security.require_api_key,
        "Extraction service initialized"
    );

    Ok(AppState::new(
        service,
        rate_limiter,
        config.security.clone(),
        config.server.environment,
        config.extraction.body_limit(),
    ))
}
