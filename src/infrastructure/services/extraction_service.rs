//! Extraction service: intake, classification and dispatch for one request

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::classification::ClassificationTag;
use crate::domain::extraction::ExtractionResult;
use crate::domain::{DomainError, RawIntake, SizeGuard};
use crate::infrastructure::extraction::{ExtractionPipeline, PipelineConfig};
use crate::infrastructure::http::RemoteFetcher;
use crate::infrastructure::intake::{TransportResolver, UploadedPart};

/// Everything the API layer needs to answer and log one request
#[derive(Debug)]
pub struct ExtractionOutcome {
    /// Classified type, when classification was reached
    pub file_type: Option<ClassificationTag>,
    /// Size of the resolved buffer, when intake succeeded
    pub file_size: Option<u64>,
    pub result: Result<ExtractionResult, DomainError>,
}

impl ExtractionOutcome {
    /// Outcome of a request that failed before a file was resolved
    pub fn failed(error: DomainError) -> Self {
        Self {
            file_type: None,
            file_size: None,
            result: Err(error),
        }
    }

    /// Whether the request produced a successful extraction
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(result) if result.success)
    }

    /// Error message for logging, from either a failure or a rejection
    pub fn error_message(&self) -> Option<String> {
        match &self.result {
            Ok(result) => result.error.clone(),
            Err(error) => Some(error.to_string()),
        }
    }
}

/// Service running the intake-to-result pipeline
#[derive(Debug, Clone)]
pub struct ExtractionService {
    resolver: TransportResolver,
    pipeline: ExtractionPipeline,
}

impl ExtractionService {
    pub fn new(resolver: TransportResolver, pipeline: ExtractionPipeline) -> Self {
        Self { resolver, pipeline }
    }

    /// Build the service from pipeline settings and a fetcher
    pub fn from_config(config: &PipelineConfig, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        let pipeline = ExtractionPipeline::from_config(config);
        let resolver = TransportResolver::new(fetcher, pipeline.size_guard());

        Self::new(resolver, pipeline)
    }

    pub fn size_guard(&self) -> SizeGuard {
        self.pipeline.size_guard()
    }

    /// Handle a JSON body (`fileUrl`, `fileBase64` or `binaryData`)
    pub async fn extract_json(&self, body: &[u8]) -> ExtractionOutcome {
        match self.resolver.resolve_json(body).await {
            Ok(intake) => self.extract_intake(&intake),
            Err(error) => {
                debug!(error = %error, "JSON intake failed");
                ExtractionOutcome::failed(error)
            }
        }
    }

    /// Handle the file fields read from a multipart body
    pub fn extract_upload(&self, parts: Vec<UploadedPart>) -> ExtractionOutcome {
        match self.resolver.resolve_upload(parts) {
            Ok(intake) => self.extract_intake(&intake),
            Err(error) => {
                debug!(error = %error, "Multipart intake failed");
                ExtractionOutcome::failed(error)
            }
        }
    }

    /// Classify and dispatch an intake that is already in memory
    pub fn extract_intake(&self, intake: &RawIntake) -> ExtractionOutcome {
        let file_size = Some(intake.len() as u64);

        let tag = match self.pipeline.classify(intake) {
            Ok(tag) => tag,
            Err(error) => {
                return ExtractionOutcome {
                    file_type: None,
                    file_size,
                    result: Err(error),
                };
            }
        };

        debug!(
            file_type = %tag,
            source = %intake.source(),
            bytes = intake.len(),
            "File classified"
        );

        let result = self.pipeline.dispatch(intake, tag);

        if let Err(error) = &result {
            warn!(file_type = %tag, error = %error, "Content handler failed");
        }

        ExtractionOutcome {
            file_type: Some(tag),
            file_size,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceTransport;
    use crate::infrastructure::http::MockRemoteFetcher;

    fn service(max_file_size: u64) -> ExtractionService {
        ExtractionService::from_config(
            &PipelineConfig {
                max_file_size,
                max_text_length: 50_000,
                allowed_extensions: vec!["pdf".to_string(), "txt".to_string()],
            },
            Arc::new(MockRemoteFetcher::new()),
        )
    }

    #[tokio::test]
    async fn test_base64_text_outcome() {
        let outcome = service(1024)
            .extract_json(br#"{"fileBase64": "dGVzdA==", "fileName": "test.txt"}"#)
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.file_type, Some(ClassificationTag::Text));
        assert_eq!(outcome.file_size, Some(4));
        assert_eq!(outcome.error_message(), None);
    }

    #[tokio::test]
    async fn test_missing_file_data_outcome() {
        let outcome = service(1024).extract_json(br#"{}"#).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.file_type, None);
        assert!(matches!(outcome.result, Err(DomainError::MissingFileData)));
    }

    #[test]
    fn test_oversized_intake_never_classified() {
        let intake = RawIntake::new(vec![b'a'; 32], None, SourceTransport::BinaryData);
        let outcome = service(16).extract_intake(&intake);

        assert_eq!(outcome.file_type, None);
        assert_eq!(outcome.file_size, Some(32));
        assert!(matches!(
            outcome.result,
            Err(DomainError::FileTooLarge { actual: 32, max: 16 })
        ));
    }

    #[test]
    fn test_rejection_reports_error_message() {
        let intake = RawIntake::new(vec![0xff, 0xd8, 0xff], None, SourceTransport::Multipart);
        let outcome = service(1024).extract_intake(&intake);

        assert!(!outcome.is_success());
        assert_eq!(outcome.file_type, Some(ClassificationTag::Image));
        assert!(outcome.error_message().unwrap().contains("OCR"));
    }
}
