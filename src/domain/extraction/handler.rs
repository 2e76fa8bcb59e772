//! Content handler trait

use std::fmt::Debug;

use crate::domain::classification::ClassificationTag;
use crate::domain::intake::RawIntake;
use crate::domain::DomainError;

use super::result::ExtractionResult;

/// Turns a classified intake into an [`ExtractionResult`]
///
/// Handlers run synchronously on an in-memory buffer and must not modify it.
pub trait ContentHandler: Send + Sync + Debug {
    /// Tags this handler accepts
    fn tags(&self) -> &[ClassificationTag];

    /// Handle an intake already classified as `tag`
    fn handle(
        &self,
        intake: &RawIntake,
        tag: ClassificationTag,
    ) -> Result<ExtractionResult, DomainError>;

    /// Check if this handler accepts a tag
    fn supports(&self, tag: ClassificationTag) -> bool {
        self.tags().contains(&tag)
    }
}
