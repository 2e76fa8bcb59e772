//! Application state for shared services

use std::sync::Arc;

use crate::api::middleware::CorsPolicy;
use crate::config::{Environment, SecurityConfig};
use crate::domain::RateLimitStore;
use crate::infrastructure::services::ExtractionService;

/// Application state shared by every request
#[derive(Clone)]
pub struct AppState {
    pub extraction_service: Arc<ExtractionService>,
    pub rate_limiter: Arc<dyn RateLimitStore>,
    pub security: Arc<SecurityConfig>,
    pub cors: Arc<CorsPolicy>,
    pub environment: Environment,
    /// Maximum accepted request body in bytes
    pub body_limit: usize,
}

impl AppState {
    pub fn new(
        extraction_service: ExtractionService,
        rate_limiter: Arc<dyn RateLimitStore>,
        security: SecurityConfig,
        environment: Environment,
        body_limit: usize,
    ) -> Self {
        let cors = CorsPolicy::new(&security.allowed_origins);

        Self {
            extraction_service: Arc::new(extraction_service),
            rate_limiter,
            security: Arc::new(security),
            cors: Arc::new(cors),
            environment,
            body_limit,
        }
    }
}
