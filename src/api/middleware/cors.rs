//! CORS against a configured origin allow-list

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");
const MAX_AGE: Duration = Duration::from_secs(86400);

/// One allow-list entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginPattern {
    Any,
    Exact(String),
    /// `https://*.example.com`, stored as scheme and `.example.com`
    Subdomain { scheme: String, suffix: String },
}

impl OriginPattern {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim().trim_end_matches('/');

        if raw == "*" {
            return Self::Any;
        }

        if let Some((scheme, host)) = raw.split_once("://") {
            if let Some(domain) = host.strip_prefix("*.") {
                return Self::Subdomain {
                    scheme: scheme.to_lowercase(),
                    suffix: format!(".{}", domain.to_lowercase()),
                };
            }
        }

        Self::Exact(raw.to_lowercase())
    }

    fn matches(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == origin,
            Self::Subdomain { scheme, suffix } => origin
                .split_once("://")
                .is_some_and(|(s, host)| {
                    s == scheme && host.ends_with(suffix.as_str()) && host.len() > suffix.len()
                }),
        }
    }
}

/// Origin allow-list supporting `*`, exact origins and wildcard subdomains
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    patterns: Vec<OriginPattern>,
}

impl CorsPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: origins
                .into_iter()
                .filter(|o| !o.as_ref().trim().is_empty())
                .map(|o| OriginPattern::parse(o.as_ref()))
                .collect(),
        }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/').to_lowercase();
        self.patterns.iter().any(|p| p.matches(&origin))
    }
}

/// CORS layer echoing origins the policy allows
pub fn cors_layer(policy: Arc<CorsPolicy>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin.to_str().is_ok_and(|o| policy.is_allowed(o))
        }))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, X_API_KEY])
        .max_age(MAX_AGE)
}

/// Preflight responses answered by the CORS layer carry no body; report them as 204
pub async fn preflight_no_content(request: Request<Body>, next: Next) -> Response {
    let is_preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;

    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_origin() {
        let policy = CorsPolicy::new(["https://app.example.com"]);

        assert!(policy.is_allowed("https://app.example.com"));
        assert!(policy.is_allowed("https://APP.example.com/"));
        assert!(!policy.is_allowed("http://app.example.com"));
        assert!(!policy.is_allowed("https://evil.com"));
    }

    #[test]
    fn test_wildcard_subdomain() {
        let policy = CorsPolicy::new(["https://*.example.com"]);

        assert!(policy.is_allowed("https://app.example.com"));
        assert!(policy.is_allowed("https://a.b.example.com"));
        assert!(!policy.is_allowed("https://example.com"));
        assert!(!policy.is_allowed("https://badexample.com"));
        assert!(!policy.is_allowed("http://app.example.com"));
    }

    #[test]
    fn test_any_origin() {
        let policy = CorsPolicy::new(["*"]);
        assert!(policy.is_allowed("http://localhost:3000"));
    }

    #[test]
    fn test_empty_list_denies() {
        let policy = CorsPolicy::new(Vec::<String>::new());
        assert!(!policy.is_allowed("https://app.example.com"));
    }
}
