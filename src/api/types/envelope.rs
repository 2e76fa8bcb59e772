//! Response envelopes for the extraction endpoint

use std::time::Duration;

use serde::Serialize;

use crate::domain::classification::ClassificationTag;
use crate::domain::extraction::{ExtractionMetadata, ExtractionResult};

/// Render an elapsed duration as `"<N>ms"`
pub fn format_execution_time(elapsed: Duration) -> String {
    format!("{}ms", elapsed.as_millis())
}

/// Successful extraction payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionData {
    pub extracted_text: String,
    pub file_name: String,
    pub file_type: ClassificationTag,
    pub metadata: ExtractionMetadata,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl From<ExtractionResult> for ExtractionData {
    fn from(result: ExtractionResult) -> Self {
        Self {
            extracted_text: result.text.unwrap_or_default(),
            file_name: result.file_name,
            file_type: result.file_type,
            metadata: result.metadata,
            truncated: result.truncated,
            hint: result.hint,
        }
    }
}

/// `{"success": true, "data": ..., "executionTime": ...}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope {
    pub success: bool,
    pub data: ExtractionData,
    pub execution_time: String,
}

impl SuccessEnvelope {
    pub fn new(result: ExtractionResult, elapsed: Duration) -> Self {
        Self {
            success: true,
            data: result.into(),
            execution_time: format_execution_time(elapsed),
        }
    }
}

/// Error detail; `type` is a classification tag for policy rejections and an
/// error code otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// `{"success": false, "error": ..., "executionTime": ...}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorDetail,
    pub execution_time: String,
}

impl ErrorEnvelope {
    pub fn new(error: ErrorDetail, elapsed: Duration) -> Self {
        Self {
            success: false,
            error,
            execution_time: format_execution_time(elapsed),
        }
    }
}
