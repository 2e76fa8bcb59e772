//! Handlers for types the service refuses to process
//!
//! These are policy rejections: they produce a failed [`ExtractionResult`]
//! carrying a hint, never a [`DomainError`].

use crate::domain::classification::{ClassificationTag, DEFAULT_ALLOWED_EXTENSIONS};
use crate::domain::extraction::{ContentHandler, ExtractionResult};
use crate::domain::{DomainError, RawIntake};

const IMAGE_MESSAGE: &str =
    "Image files are not supported. Text recognition (OCR) from images is not available.";
const IMAGE_HINT: &str =
    "Convert the image to a PDF or text file with an OCR tool before uploading.";

const DOCUMENT_MESSAGE: &str = "DOC, DOCX and other ZIP-based document formats are not \
                                supported directly and must be converted before upload.";
const DOCUMENT_HINT: &str =
    "Supported formats: PDF, TXT, HTML. Save the document as PDF or plain text and try again.";

const UNKNOWN_MESSAGE: &str = "Unsupported or unrecognized file type.";

/// Rejects images
#[derive(Debug, Clone, Default)]
pub struct ImageRejectionHandler;

impl ContentHandler for ImageRejectionHandler {
    fn tags(&self) -> &[ClassificationTag] {
        &[ClassificationTag::Image]
    }

    fn handle(
        &self,
        intake: &RawIntake,
        tag: ClassificationTag,
    ) -> Result<ExtractionResult, DomainError> {
        Ok(
            ExtractionResult::rejected(tag, intake.display_name(), intake.len() as u64, IMAGE_MESSAGE)
                .with_hint(IMAGE_HINT),
        )
    }
}

/// Rejects legacy and ZIP-based office documents
#[derive(Debug, Clone, Default)]
pub struct DocumentRejectionHandler;

impl ContentHandler for DocumentRejectionHandler {
    fn tags(&self) -> &[ClassificationTag] {
        &[ClassificationTag::Document]
    }

    fn handle(
        &self,
        intake: &RawIntake,
        tag: ClassificationTag,
    ) -> Result<ExtractionResult, DomainError> {
        Ok(ExtractionResult::rejected(
            tag,
            intake.display_name(),
            intake.len() as u64,
            DOCUMENT_MESSAGE,
        )
        .with_hint(DOCUMENT_HINT))
    }
}

/// Rejects anything the classifier could not identify
#[derive(Debug, Clone)]
pub struct UnknownTypeHandler {
    allowed_extensions: Vec<String>,
}

impl UnknownTypeHandler {
    pub fn new(allowed_extensions: Vec<String>) -> Self {
        Self { allowed_extensions }
    }
}

impl Default for UnknownTypeHandler {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        )
    }
}

impl ContentHandler for UnknownTypeHandler {
    fn tags(&self) -> &[ClassificationTag] {
        &[ClassificationTag::Unknown]
    }

    fn handle(
        &self,
        intake: &RawIntake,
        tag: ClassificationTag,
    ) -> Result<ExtractionResult, DomainError> {
        let hint = format!(
            "Supported file types: {}",
            self.allowed_extensions.join(", ")
        );

        Ok(ExtractionResult::rejected(
            tag,
            intake.display_name(),
            intake.len() as u64,
            UNKNOWN_MESSAGE,
        )
        .with_hint(hint)
        .with_allowed_types(self.allowed_extensions.clone()))
    }
}
