//! Request logging with sensitive header redaction, plus the per-request
//! extraction outcome record

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};

/// Maximum user agent length kept in outcome records
pub const USER_AGENT_LOG_LIMIT: usize = 100;

/// Middleware to log HTTP requests and responses with sensitive data redaction.
/// Does not open its own span; `TraceLayer` already does.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);
    let headers_log = redact_headers(&request);

    debug!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

    let response = next.run(request).await;

    debug!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

/// Structured record written once per extraction request
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub client: String,
    pub method: String,
    pub path: String,
    pub user_agent: Option<String>,
    pub duration_ms: u128,
    pub success: bool,
    pub file_type: Option<String>,
    pub file_size: Option<u64>,
    pub error: Option<String>,
}

/// Emit the outcome record; never fails
pub fn log_request_outcome(outcome: &RequestOutcome) {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let user_agent = outcome
        .user_agent
        .as_deref()
        .map(|ua| truncate_for_log(ua, USER_AGENT_LOG_LIMIT))
        .unwrap_or_default();
    let file_type = outcome.file_type.as_deref().unwrap_or("");
    let error = outcome.error.as_deref().unwrap_or("");

    if outcome.success {
        info!(
            timestamp = %timestamp,
            client = %outcome.client,
            method = %outcome.method,
            path = %outcome.path,
            user_agent = %user_agent,
            duration_ms = outcome.duration_ms as u64,
            success = outcome.success,
            file_type = %file_type,
            file_size = outcome.file_size,
            "Extraction request"
        );
    } else {
        warn!(
            timestamp = %timestamp,
            client = %outcome.client,
            method = %outcome.method,
            path = %outcome.path,
            user_agent = %user_agent,
            duration_ms = outcome.duration_ms as u64,
            success = outcome.success,
            file_type = %file_type,
            file_size = outcome.file_size,
            error = %error,
            "Extraction request"
        );
    }
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Redact sensitive headers for logging
fn redact_headers(request: &Request<Body>) -> String {
    let mut parts = Vec::new();

    for (name, value) in request.headers() {
        let name_str = name.as_str().to_lowercase();

        if !should_log_header(&name_str) {
            continue;
        }

        let value_str = if is_sensitive_header(&name_str) {
            "[REDACTED]".to_string()
        } else {
            value.to_str().unwrap_or("[invalid]").to_string()
        };

        parts.push(format!("{}={}", name_str, value_str));
    }

    parts.join(", ")
}

fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "x-api-key" | "cookie" | "set-cookie" | "proxy-authorization"
    )
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "origin"
            | "user-agent"
            | "x-request-id"
            | "x-forwarded-for"
            | "x-real-ip"
            | "authorization"
            | "x-api-key"
    )
}

/// Cut a string to at most `max_chars` characters
pub fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sensitive_header() {
        assert!(is_sensitive_header("authorization"));
        assert!(is_sensitive_header("x-api-key"));
        assert!(!is_sensitive_header("content-type"));
    }

    #[test]
    fn test_redact_headers() {
        let request = Request::builder()
            .header("x-api-key", "secret-key")
            .header("content-type", "application/json")
            .header("etag", "abc")
            .body(Body::empty())
            .unwrap();

        let logged = redact_headers(&request);
        assert!(logged.contains("x-api-key=[REDACTED]"));
        assert!(logged.contains("content-type=application/json"));
        assert!(!logged.contains("secret-key"));
        assert!(!logged.contains("etag"));
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("curl/8.0", USER_AGENT_LOG_LIMIT), "curl/8.0");
        assert_eq!(truncate_for_log(&"x".repeat(150), USER_AGENT_LOG_LIMIT).len(), 100);
        assert_eq!(truncate_for_log("ééé", 2), "éé");
    }

    #[test]
    fn test_log_request_outcome_without_subscriber() {
        log_request_outcome(&RequestOutcome {
            client: "unknown".to_string(),
            method: "POST".to_string(),
            path: "/api/extract-text".to_string(),
            user_agent: Some("x".repeat(300)),
            duration_ms: 5,
            success: false,
            file_type: None,
            file_size: None,
            error: Some("Missing file data".to_string()),
        });
    }
}
