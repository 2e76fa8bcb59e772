//! Plain text and HTML handler

use crate::domain::classification::ClassificationTag;
use crate::domain::extraction::{
    ContentHandler, ExtractionMetadata, ExtractionResult, DEFAULT_MAX_TEXT_LENGTH,
};
use crate::domain::{DomainError, RawIntake};

/// Appended to text cut at the configured maximum length
pub const TRUNCATION_NOTICE: &str = "\n\n[... Text truncated due to length ...]";

/// Handler for text-like files: returns the decoded content as is
#[derive(Debug, Clone)]
pub struct TextHandler {
    max_text_length: usize,
}

impl TextHandler {
    pub fn new(max_text_length: usize) -> Self {
        Self { max_text_length }
    }

    pub fn max_text_length(&self) -> usize {
        self.max_text_length
    }
}

impl Default for TextHandler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXT_LENGTH)
    }
}

impl ContentHandler for TextHandler {
    fn tags(&self) -> &[ClassificationTag] {
        &[
            ClassificationTag::Text,
            ClassificationTag::Txt,
            ClassificationTag::Html,
            ClassificationTag::Htm,
        ]
    }

    fn handle(
        &self,
        intake: &RawIntake,
        tag: ClassificationTag,
    ) -> Result<ExtractionResult, DomainError> {
        let text = std::str::from_utf8(intake.buffer())
            .map_err(|e| DomainError::text_decoding(format!("File is not valid UTF-8: {}", e)))?;

        let file_size = intake.len() as u64;
        let file_name = intake.display_name();
        let char_count = text.chars().count();

        if char_count > self.max_text_length {
            let cut = text
                .char_indices()
                .nth(self.max_text_length)
                .map(|(index, _)| index)
                .unwrap_or(text.len());

            let truncated = format!("{}{}", &text[..cut], TRUNCATION_NOTICE);
            let metadata = ExtractionMetadata::new(file_size)
                .with_truncation(char_count, self.max_text_length);

            return Ok(ExtractionResult::success(tag, file_name, truncated, metadata)
                .with_truncated(true));
        }

        let metadata = ExtractionMetadata::new(file_size)
            .with_text_length(char_count)
            .with_lines(count_lines(text));

        Ok(ExtractionResult::success(tag, file_name, text, metadata))
    }
}

/// Newline-delimited segments; content without a newline is one line
pub fn count_lines(text: &str) -> usize {
    text.matches('\n').count() + 1
}
