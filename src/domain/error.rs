use thiserror::Error;

/// Core domain errors
///
/// Every failure of the intake and extraction pipeline is converted into one of these
/// variants where it happens; nothing else crosses the dispatch boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    #[error("No file provided. Upload a file in one of the fields: {fields}")]
    NoFileProvided { fields: String },

    #[error("Missing file data. Provide one of: fileUrl, fileBase64 or binaryData")]
    MissingFileData,

    #[error("Invalid file encoding: {message}")]
    InvalidEncoding { message: String },

    #[error("Failed to download file: {reason}")]
    DownloadFailed { reason: String },

    #[error("File too large: {actual} bytes (max: {max} bytes)")]
    FileTooLarge { actual: u64, max: u64 },

    #[error("Failed to decode text content: {message}")]
    TextDecoding { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Too many requests. Retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Method {method} not allowed")]
    MethodNotAllowed { method: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Error taxonomy used for logging and status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Intake,
    Download,
    SizeLimit,
    Decoding,
    Auth,
    RateLimit,
    Method,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intake => write!(f, "IntakeError"),
            Self::Download => write!(f, "DownloadError"),
            Self::SizeLimit => write!(f, "SizeLimitError"),
            Self::Decoding => write!(f, "DecodingError"),
            Self::Auth => write!(f, "AuthError"),
            Self::RateLimit => write!(f, "RateLimitError"),
            Self::Method => write!(f, "MethodError"),
            Self::Internal => write!(f, "InternalError"),
        }
    }
}

impl DomainError {
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody {
            message: message.into(),
        }
    }

    pub fn no_file_provided(fields: &[&str]) -> Self {
        Self::NoFileProvided {
            fields: fields.join(", "),
        }
    }

    pub fn invalid_encoding(message: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            message: message.into(),
        }
    }

    pub fn download_failed(reason: impl Into<String>) -> Self {
        Self::DownloadFailed {
            reason: reason.into(),
        }
    }

    pub fn file_too_large(actual: u64, max: u64) -> Self {
        Self::FileTooLarge { actual, max }
    }

    pub fn text_decoding(message: impl Into<String>) -> Self {
        Self::TextDecoding {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn method_not_allowed(method: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            method: method.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wire code reported in the error envelope's `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidBody { .. } => "invalid_body",
            Self::NoFileProvided { .. } => "no_file_provided",
            Self::MissingFileData => "missing_file_data",
            Self::InvalidEncoding { .. } => "invalid_encoding",
            Self::DownloadFailed { .. } => "download_failed",
            Self::FileTooLarge { .. } => "file_too_large",
            Self::TextDecoding { .. } => "text_decoding_error",
            Self::Unauthorized { .. } => "unauthorized",
            Self::RateLimited { .. } => "rate_limit_exceeded",
            Self::MethodNotAllowed { .. } => "method_not_allowed",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidBody { .. } | Self::NoFileProvided { .. } | Self::MissingFileData => {
                ErrorCategory::Intake
            }
            Self::DownloadFailed { .. } => ErrorCategory::Download,
            Self::FileTooLarge { .. } => ErrorCategory::SizeLimit,
            Self::InvalidEncoding { .. } | Self::TextDecoding { .. } => ErrorCategory::Decoding,
            Self::Unauthorized { .. } => ErrorCategory::Auth,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::MethodNotAllowed { .. } => ErrorCategory::Method,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_too_large_message() {
        let error = DomainError::file_too_large(60, 50);
        assert_eq!(error.to_string(), "File too large: 60 bytes (max: 50 bytes)");
        assert_eq!(error.kind(), "file_too_large");
        assert_eq!(error.category(), ErrorCategory::SizeLimit);
    }

    #[test]
    fn test_download_failed_keeps_reason() {
        let error = DomainError::download_failed("HTTP 404 Not Found");
        assert_eq!(
            error.to_string(),
            "Failed to download file: HTTP 404 Not Found"
        );
        assert_eq!(error.category(), ErrorCategory::Download);
    }

    #[test]
    fn test_no_file_provided_lists_fields() {
        let error = DomainError::no_file_provided(&["file", "resume", "document"]);
        assert!(error.to_string().contains("file, resume, document"));
        assert_eq!(error.category(), ErrorCategory::Intake);
    }

    #[test]
    fn test_decoding_category() {
        assert_eq!(
            DomainError::invalid_encoding("bad").category(),
            ErrorCategory::Decoding
        );
        assert_eq!(
            DomainError::text_decoding("bad").category(),
            ErrorCategory::Decoding
        );
        assert_eq!(ErrorCategory::Decoding.to_string(), "DecodingError");
    }
}
