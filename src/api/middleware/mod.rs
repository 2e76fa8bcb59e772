//! API middleware components

pub mod auth;
pub mod client;
pub mod cors;
pub mod logging;
pub mod metrics;
pub mod security;

pub use auth::{authorize, extract_api_key_from_headers};
pub use client::ClientIdentity;
pub use cors::{cors_layer, preflight_no_content, CorsPolicy};
pub use logging::{log_request_outcome, logging_middleware, truncate_for_log, RequestOutcome};
pub use metrics::metrics_middleware;
pub use security::security_headers_middleware;
