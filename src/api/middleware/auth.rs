//! API key check
//!
//! Extracts the API key from either:
//! - Authorization header: `Bearer <api_key>`
//! - X-API-Key header: `<api_key>`

use axum::http::{header, HeaderMap};
use tracing::debug;

use crate::config::SecurityConfig;
use crate::domain::DomainError;

/// Verify the request carries an acceptable API key
///
/// Passes unconditionally unless `require_api_key` is set. With an empty key
/// list any non-empty key is accepted.
pub fn authorize(headers: &HeaderMap, security: &SecurityConfig) -> Result<(), DomainError> {
    if !security.require_api_key {
        return Ok(());
    }

    let key = extract_api_key_from_headers(headers)?;

    debug!(
        key_prefix = %key.chars().take(4).collect::<String>(),
        "Checking API key"
    );

    if security.api_keys.is_empty() || security.api_keys.iter().any(|k| k == &key) {
        return Ok(());
    }

    Err(DomainError::unauthorized("Invalid API key"))
}

pub fn extract_api_key_from_headers(headers: &HeaderMap) -> Result<String, DomainError> {
    // Bearer token first
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| DomainError::unauthorized("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return non_empty_key(token);
        }
    }

    if let Some(api_key_header) = headers.get("x-api-key") {
        let key = api_key_header
            .to_str()
            .map_err(|_| DomainError::unauthorized("Invalid X-API-Key header encoding"))?;

        return non_empty_key(key);
    }

    Err(DomainError::unauthorized("API key required"))
}

fn non_empty_key(raw: &str) -> Result<String, DomainError> {
    let key = raw.trim();

    if key.is_empty() {
        return Err(DomainError::unauthorized("API key required"));
    }

    Ok(key.to_string())
}
