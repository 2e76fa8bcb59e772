//! PDF preview handler
//!
//! PDFs are detected but not parsed. The handler returns a fixed notice and a
//! printable preview of the raw bytes. `pages` is always 1; the page count is
//! never read from the file.

use crate::domain::classification::ClassificationTag;
use crate::domain::extraction::{ContentHandler, ExtractionMetadata, ExtractionResult};
use crate::domain::{DomainError, RawIntake};

/// Number of leading bytes used for the preview
pub const PREVIEW_BYTES: usize = 1000;

/// Page count reported for every PDF
pub const PLACEHOLDER_PAGE_COUNT: u32 = 1;

const PDF_HINT: &str = "Full PDF text extraction is not available. Convert the PDF to a text \
                        file (or copy its text into a .txt file) and upload that instead.";

/// Handler for files classified as PDF
#[derive(Debug, Clone, Default)]
pub struct PdfPreviewHandler;

impl PdfPreviewHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ContentHandler for PdfPreviewHandler {
    fn tags(&self) -> &[ClassificationTag] {
        &[ClassificationTag::Pdf]
    }

    fn handle(
        &self,
        intake: &RawIntake,
        tag: ClassificationTag,
    ) -> Result<ExtractionResult, DomainError> {
        let preview = printable_preview(intake.buffer(), PREVIEW_BYTES);
        let file_name = intake.display_name();

        let text = format!(
            "PDF file detected: {}\n\n\
             Text extraction from PDF files is not supported by this service. \
             The content below is a raw preview of the first {} bytes.\n\n\
             Preview:\n{}",
            file_name, PREVIEW_BYTES, preview
        );

        let metadata = ExtractionMetadata::new(intake.len() as u64)
            .with_pages(PLACEHOLDER_PAGE_COUNT)
            .with_preview(preview);

        Ok(ExtractionResult::success(tag, file_name, text, metadata).with_hint(PDF_HINT))
    }
}

/// Printable ASCII and whitespace from the first `limit` bytes
pub fn printable_preview(buffer: &[u8], limit: usize) -> String {
    buffer
        .iter()
        .take(limit)
        .copied()
        .filter(|b| matches!(*b, 0x20..=0x7e | b'\n' | b'\r' | b'\t'))
        .map(char::from)
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceTransport;

    fn intake(bytes: &[u8]) -> RawIntake {
        RawIntake::new(bytes.to_vec(), Some("cv.pdf".to_string()), SourceTransport::Base64)
    }

    #[test]
    fn test_pdf_result_shape() {
        let handler = PdfPreviewHandler::new();
        let result = handler
            .handle(&intake(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj"), ClassificationTag::Pdf)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.file_type, ClassificationTag::Pdf);
        assert_eq!(result.metadata.pages, Some(1));
        assert_eq!(result.metadata.preview.as_deref(), Some("%PDF-1.4\n%\n1 0 obj"));
        assert!(result.hint.is_some());
        assert!(result.text.unwrap().contains("cv.pdf"));
    }

    #[test]
    fn test_preview_is_bounded() {
        let mut bytes = b"%PDF-1.7 ".to_vec();
        bytes.extend(std::iter::repeat_n(b'x', 5000));

        let preview = printable_preview(&bytes, PREVIEW_BYTES);
        assert_eq!(preview.len(), PREVIEW_BYTES);
    }

    #[test]
    fn test_preview_strips_control_bytes() {
        assert_eq!(printable_preview(b"\x00a\x01b\x7fc\xff", 100), "abc");
    }

    #[test]
    fn test_handler_tags() {
        assert!(PdfPreviewHandler::new().supports(ClassificationTag::Pdf));
        assert!(!PdfPreviewHandler::new().supports(ClassificationTag::Text));
    }
}
