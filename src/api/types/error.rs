//! API error type rendered as the error envelope

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::extraction::ExtractionResult;
use crate::domain::{DomainError, ErrorCategory};

use super::envelope::{ErrorDetail, ErrorEnvelope};

const WITHHELD_MESSAGE: &str = "Internal server error";
const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: ErrorDetail,
    pub execution_time: Duration,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            detail: ErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
                hint: None,
                allowed_types: None,
                retry_after: None,
            },
            execution_time: Duration::ZERO,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.detail.hint = Some(hint.into());
        self
    }

    pub fn with_allowed_types(mut self, allowed: Vec<String>) -> Self {
        self.detail.allowed_types = Some(allowed);
        self
    }

    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.detail.retry_after = Some(secs);
        self
    }

    pub fn with_execution_time(mut self, elapsed: Duration) -> Self {
        self.execution_time = elapsed;
        self
    }

    /// Replace internal error detail with a generic message
    pub fn withhold_internal_detail(mut self, withhold: bool) -> Self {
        if withhold && self.status == StatusCode::INTERNAL_SERVER_ERROR {
            self.detail.message = WITHHELD_MESSAGE.to_string();
            self.detail.hint = None;
        }
        self
    }

    /// Policy rejection of a classified file; `type` carries the tag
    pub fn rejection(result: ExtractionResult) -> Self {
        let message = result
            .error
            .unwrap_or_else(|| "Unsupported file type".to_string());

        let mut error = Self::new(StatusCode::BAD_REQUEST, result.file_type.as_str(), message);
        error.detail.hint = result.hint;
        error.detail.allowed_types = result.allowed_types;
        error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let retry_after = self.detail.retry_after;
        let status = self.status;
        let envelope = ErrorEnvelope::new(self.detail, self.execution_time);

        let mut response = (status, Json(envelope)).into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }

        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match err.category() {
            ErrorCategory::Auth => StatusCode::UNAUTHORIZED,
            ErrorCategory::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            ErrorCategory::Method => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCategory::Intake
            | ErrorCategory::Download
            | ErrorCategory::SizeLimit
            | ErrorCategory::Decoding => StatusCode::BAD_REQUEST,
        };

        let error = Self::new(status, err.kind(), err.to_string());

        match err {
            DomainError::RateLimited { retry_after_secs } => error.with_retry_after(retry_after_secs),
            DomainError::FileTooLarge { max, .. } => error.with_hint(format!(
                "Maximum file size is {} MB",
                max / (1024 * 1024)
            )),
            DomainError::Unauthorized { .. } => error.with_hint(
                "Provide a key via 'X-API-Key: <key>' or 'Authorization: Bearer <key>'",
            ),
            _ => error,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.detail.error_type, self.detail.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classification::ClassificationTag;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::invalid_body("x"), StatusCode::BAD_REQUEST),
            (DomainError::MissingFileData, StatusCode::BAD_REQUEST),
            (DomainError::download_failed("HTTP 404"), StatusCode::BAD_REQUEST),
            (DomainError::file_too_large(10, 5), StatusCode::BAD_REQUEST),
            (DomainError::text_decoding("x"), StatusCode::BAD_REQUEST),
            (DomainError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (DomainError::rate_limited(3), StatusCode::TOO_MANY_REQUESTS),
            (DomainError::method_not_allowed("GET"), StatusCode::METHOD_NOT_ALLOWED),
            (DomainError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            assert_eq!(ApiError::from(domain_err).status, status);
        }
    }

    #[test]
    fn test_rate_limit_carries_retry_after() {
        let err = ApiError::from(DomainError::rate_limited(17));
        assert_eq!(err.detail.retry_after, Some(17));
        assert_eq!(err.detail.error_type, "rate_limit_exceeded");

        let response = err.into_response();
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "17");
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError::from(DomainError::method_not_allowed("PUT")).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), ALLOWED_METHODS);
    }

    #[test]
    fn test_rejection_uses_tag_as_type() {
        let result = ExtractionResult::rejected(ClassificationTag::Unknown, "blob", 3, "nope")
            .with_hint("Supported file types: pdf")
            .with_allowed_types(vec!["pdf".to_string()]);

        let err = ApiError::rejection(result);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail.error_type, "unknown");
        assert_eq!(err.detail.message, "nope");
        assert_eq!(err.detail.allowed_types, Some(vec!["pdf".to_string()]));
    }

    #[test]
    fn test_internal_detail_withheld_in_production() {
        let err = ApiError::from(DomainError::internal("db exploded")).withhold_internal_detail(true);
        assert_eq!(err.detail.message, WITHHELD_MESSAGE);

        let err = ApiError::from(DomainError::internal("db exploded")).withhold_internal_detail(false);
        assert!(err.detail.message.contains("db exploded"));

        let err = ApiError::from(DomainError::MissingFileData).withhold_internal_detail(true);
        assert!(err.detail.message.contains("Missing file data"));
    }

    #[test]
    fn test_size_error_reports_actual_bytes() {
        let err = ApiError::from(DomainError::file_too_large(60 * 1024 * 1024, 50 * 1024 * 1024));
        assert!(err.detail.message.contains(&(60 * 1024 * 1024).to_string()));
        assert_eq!(err.detail.hint.as_deref(), Some("Maximum file size is 50 MB"));
    }
}
