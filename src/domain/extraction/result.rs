//! Extraction result produced by content handlers

use serde::{Deserialize, Serialize};

use crate::domain::classification::ClassificationTag;

/// Metadata reported alongside an extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_length: Option<usize>,
}

impl ExtractionMetadata {
    pub fn new(file_size: u64) -> Self {
        Self {
            file_size,
            ..Self::default()
        }
    }

    pub fn with_text_length(mut self, text_length: usize) -> Self {
        self.text_length = Some(text_length);
        self
    }

    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines = Some(lines);
        self
    }

    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    pub fn with_truncation(mut self, original_length: usize, extracted_length: usize) -> Self {
        self.original_length = Some(original_length);
        self.extracted_length = Some(extracted_length);
        self
    }
}

/// Outcome of one content handler
///
/// Policy rejections (images, office documents, unknown types) are results with
/// `success == false`, not errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub success: bool,
    pub file_type: ClassificationTag,
    pub file_name: String,
    pub text: Option<String>,
    pub metadata: ExtractionMetadata,
    pub truncated: bool,
    pub error: Option<String>,
    pub hint: Option<String>,
    pub allowed_types: Option<Vec<String>>,
}

impl ExtractionResult {
    /// Successful extraction
    pub fn success(
        file_type: ClassificationTag,
        file_name: impl Into<String>,
        text: impl Into<String>,
        metadata: ExtractionMetadata,
    ) -> Self {
        Self {
            success: true,
            file_type,
            file_name: file_name.into(),
            text: Some(text.into()),
            metadata,
            truncated: false,
            error: None,
            hint: None,
            allowed_types: None,
        }
    }

    /// Policy rejection for a classified type
    pub fn rejected(
        file_type: ClassificationTag,
        file_name: impl Into<String>,
        file_size: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            file_type,
            file_name: file_name.into(),
            text: None,
            metadata: ExtractionMetadata::new(file_size),
            truncated: false,
            error: Some(error.into()),
            hint: None,
            allowed_types: None,
        }
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_allowed_types(mut self, allowed: Vec<String>) -> Self {
        self.allowed_types = Some(allowed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serializes_camel_case() {
        let metadata = ExtractionMetadata::new(4).with_text_length(4).with_lines(1);
        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["fileSize"], 4);
        assert_eq!(json["textLength"], 4);
        assert_eq!(json["lines"], 1);
        assert!(json.get("pages").is_none());
        assert!(json.get("originalLength").is_none());
    }

    #[test]
    fn test_rejected_result() {
        let result = ExtractionResult::rejected(ClassificationTag::Image, "a.png", 10, "nope")
            .with_hint("convert it");

        assert!(!result.success);
        assert_eq!(result.text, None);
        assert_eq!(result.error.as_deref(), Some("nope"));
        assert_eq!(result.hint.as_deref(), Some("convert it"));
        assert_eq!(result.metadata.file_size, 10);
    }
}
