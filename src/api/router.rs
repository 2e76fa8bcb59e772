use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::extract;
use super::health;
use super::middleware::{
    cors_layer, logging_middleware, metrics_middleware, preflight_no_content,
    security_headers_middleware,
};
use super::state::AppState;

pub const EXTRACT_TEXT_PATH: &str = "/api/extract-text";

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let extract_route = post(extract::extract_text).fallback(extract::method_not_allowed);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route(EXTRACT_TEXT_PATH, extract_route)
        .layer(DefaultBodyLimit::max(state.body_limit))
        .layer(cors_layer(state.cors.clone()))
        .layer(middleware::from_fn(preflight_no_content))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(metrics_middleware))
                .layer(middleware::from_fn(logging_middleware))
                .layer(middleware::from_fn(security_headers_middleware)),
        )
}
