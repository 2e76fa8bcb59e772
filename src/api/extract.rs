//! `POST /api/extract-text`

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::BytesMut;

use crate::domain::{DomainError, SizeGuard};
use crate::infrastructure::intake::{UploadedPart, UPLOAD_FIELDS};
use crate::infrastructure::observability::record_extraction;
use crate::infrastructure::services::ExtractionOutcome;

use super::middleware::{authorize, log_request_outcome, ClientIdentity, RequestOutcome};
use super::state::AppState;
use super::types::{ApiError, SuccessEnvelope};

/// Rate limit, API key check, intake, pipeline and response formatting
pub async fn extract_text(
    State(state): State<AppState>,
    client: ClientIdentity,
    request: Request,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let outcome = run_extraction(&state, &client, request).await;
    let elapsed = start.elapsed();
    let file_type = outcome.file_type.map(|tag| tag.to_string());

    log_request_outcome(&RequestOutcome {
        client: client.0,
        method,
        path,
        user_agent,
        duration_ms: elapsed.as_millis(),
        success: outcome.is_success(),
        file_type: file_type.clone(),
        file_size: outcome.file_size,
        error: outcome.error_message(),
    });
    record_extraction(file_type.as_deref(), outcome.is_success(), outcome.file_size);

    match outcome.result {
        Ok(result) if result.success => {
            (StatusCode::OK, Json(SuccessEnvelope::new(result, elapsed))).into_response()
        }
        Ok(rejected) => ApiError::rejection(rejected)
            .with_execution_time(elapsed)
            .into_response(),
        Err(error) => ApiError::from(error)
            .with_execution_time(elapsed)
            .withhold_internal_detail(state.environment.is_production())
            .into_response(),
    }
}

/// Any method other than POST or OPTIONS
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::from(DomainError::method_not_allowed(method.as_str()))
}

async fn run_extraction(
    state: &AppState,
    client: &ClientIdentity,
    request: Request,
) -> ExtractionOutcome {
    let decision = state.rate_limiter.check_and_record(client.as_str()).await;

    if !decision.allowed {
        return ExtractionOutcome::failed(DomainError::rate_limited(decision.retry_after_secs));
    }

    if let Err(error) = authorize(request.headers(), &state.security) {
        return ExtractionOutcome::failed(error);
    }

    let service = &state.extraction_service;
    let overflow = BodyOverflow {
        declared: declared_length(request.headers()),
        body_limit: state.body_limit as u64,
        guard: service.size_guard(),
    };

    if is_multipart(request.headers()) {
        return match read_upload_parts(request, service.size_guard(), overflow).await {
            Ok(parts) => service.extract_upload(parts),
            Err(error) => ExtractionOutcome::failed(error),
        };
    }

    match Bytes::from_request(request, state).await {
        Ok(body) => service.extract_json(&body).await,
        Err(rejection) => ExtractionOutcome::failed(
            overflow.body_error(rejection.status(), rejection.body_text()),
        ),
    }
}

/// Maps body read failures; hitting the body limit is a size overflow
#[derive(Debug, Clone, Copy)]
struct BodyOverflow {
    declared: Option<u64>,
    body_limit: u64,
    guard: SizeGuard,
}

impl BodyOverflow {
    /// `actual` is the declared `Content-Length`, or the bytes buffered before the cutoff
    fn body_error(&self, status: StatusCode, message: String) -> DomainError {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            let actual = self.declared.unwrap_or(self.body_limit);
            return DomainError::file_too_large(actual, self.guard.max_bytes());
        }

        DomainError::invalid_body(message)
    }
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// Read the upload fields, enforcing the size limit while streaming
async fn read_upload_parts(
    request: Request,
    guard: SizeGuard,
    overflow: BodyOverflow,
) -> Result<Vec<UploadedPart>, DomainError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| DomainError::invalid_body(e.body_text()))?;

    let mut parts = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        overflow.body_error(e.status(), format!("Failed to read multipart field: {e}"))
    })? {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        if !UPLOAD_FIELDS.contains(&field_name.as_str()) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let mut buffer = BytesMut::new();

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| overflow.body_error(e.status(), format!("Failed to read file chunk: {e}")))?
        {
            buffer.extend_from_slice(&chunk);
            guard.check_streamed(buffer.len() as u64)?;
        }

        parts.push(UploadedPart {
            field_name,
            file_name,
            bytes: buffer.freeze(),
        });
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_multipart() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            "Multipart/Form-Data; boundary=x".parse().unwrap(),
        );
        assert!(is_multipart(&headers));

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(!is_multipart(&headers));
    }

    fn overflow(declared: Option<u64>) -> BodyOverflow {
        BodyOverflow {
            declared,
            body_limit: 5000,
            guard: SizeGuard::new(1000),
        }
    }

    #[test]
    fn test_body_limit_hit_is_file_too_large() {
        let error = overflow(Some(8000)).body_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "length limit exceeded".to_string(),
        );

        assert!(matches!(
            error,
            DomainError::FileTooLarge {
                actual: 8000,
                max: 1000
            }
        ));
    }

    #[test]
    fn test_body_limit_hit_without_content_length() {
        let error = overflow(None).body_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "length limit exceeded".to_string(),
        );

        assert!(matches!(
            error,
            DomainError::FileTooLarge {
                actual: 5000,
                max: 1000
            }
        ));
    }

    #[test]
    fn test_other_body_failures_are_invalid_body() {
        let error = overflow(None).body_error(StatusCode::BAD_REQUEST, "bad".to_string());
        assert!(matches!(error, DomainError::InvalidBody { .. }));
    }

    #[test]
    fn test_declared_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_length(&headers), None);

        headers.insert(header::CONTENT_LENGTH, "2048".parse().unwrap());
        assert_eq!(declared_length(&headers), Some(2048));
    }
}
