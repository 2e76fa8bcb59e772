//! Maps classification tags to content handlers

use std::sync::Arc;

use tracing::debug;

use crate::domain::classification::ClassificationTag;
use crate::domain::extraction::{ContentHandler, ExtractionResult, SizeGuard};
use crate::domain::{DomainError, RawIntake};

use super::handlers::{
    DocumentRejectionHandler, ImageRejectionHandler, PdfPreviewHandler, TextHandler,
    UnknownTypeHandler,
};

/// Routes a classified intake to the handler registered for its tag
#[derive(Debug, Clone)]
pub struct HandlerDispatcher {
    handlers: Vec<Arc<dyn ContentHandler>>,
    guard: SizeGuard,
}

impl HandlerDispatcher {
    /// Create a dispatcher with no handlers
    pub fn new(guard: SizeGuard) -> Self {
        Self {
            handlers: Vec::new(),
            guard,
        }
    }

    /// Create a dispatcher with the standard handler set
    pub fn standard(guard: SizeGuard, max_text_length: usize, allowed_extensions: Vec<String>) -> Self {
        Self::new(guard)
            .with_handler(Arc::new(PdfPreviewHandler::new()))
            .with_handler(Arc::new(TextHandler::new(max_text_length)))
            .with_handler(Arc::new(ImageRejectionHandler))
            .with_handler(Arc::new(DocumentRejectionHandler))
            .with_handler(Arc::new(UnknownTypeHandler::new(allowed_extensions)))
    }

    /// Register a handler; earlier registrations win on overlapping tags
    pub fn with_handler(mut self, handler: Arc<dyn ContentHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Find the handler for a tag
    pub fn handler_for(&self, tag: ClassificationTag) -> Option<&Arc<dyn ContentHandler>> {
        self.handlers.iter().find(|h| h.supports(tag))
    }

    /// Run the handler for `tag`
    ///
    /// The size limit is checked again here so no handler ever sees an
    /// oversized buffer, whichever path led to it.
    pub fn dispatch(
        &self,
        intake: &RawIntake,
        tag: ClassificationTag,
    ) -> Result<ExtractionResult, DomainError> {
        self.guard.check_assembled(intake.len())?;

        let handler = self.handler_for(tag).ok_or_else(|| {
            DomainError::internal(format!("No handler registered for file type '{}'", tag))
        })?;

        debug!(file_type = %tag, bytes = intake.len(), "Dispatching to content handler");

        handler.handle(intake, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceTransport;

    fn dispatcher(max_bytes: u64) -> HandlerDispatcher {
        HandlerDispatcher::standard(SizeGuard::new(max_bytes), 100, vec!["txt".to_string()])
    }

    fn intake(bytes: &[u8]) -> RawIntake {
        RawIntake::new(bytes.to_vec(), None, SourceTransport::Base64)
    }

    #[test]
    fn test_every_tag_has_a_handler() {
        let dispatcher = dispatcher(1024);

        for tag in [
            ClassificationTag::Pdf,
            ClassificationTag::Text,
            ClassificationTag::Txt,
            ClassificationTag::Html,
            ClassificationTag::Htm,
            ClassificationTag::Image,
            ClassificationTag::Document,
            ClassificationTag::Unknown,
        ] {
            assert!(dispatcher.handler_for(tag).is_some(), "missing handler for {}", tag);
        }
    }

    #[test]
    fn test_dispatch_rechecks_size() {
        let dispatcher = dispatcher(3);
        let err = dispatcher
            .dispatch(&intake(b"test"), ClassificationTag::Text)
            .unwrap_err();

        assert!(matches!(err, DomainError::FileTooLarge { actual: 4, max: 3 }));
    }

    #[test]
    fn test_dispatch_without_handler_is_internal() {
        let dispatcher = HandlerDispatcher::new(SizeGuard::new(1024));
        let err = dispatcher
            .dispatch(&intake(b"test"), ClassificationTag::Text)
            .unwrap_err();

        assert!(matches!(err, DomainError::Internal { .. }));
    }

    #[test]
    fn test_dispatch_routes_by_tag() {
        let dispatcher = dispatcher(1024);

        let text = dispatcher.dispatch(&intake(b"hi"), ClassificationTag::Htm).unwrap();
        assert!(text.success);
        assert_eq!(text.file_type, ClassificationTag::Htm);

        let unknown = dispatcher
            .dispatch(&intake(b"\x00\x01"), ClassificationTag::Unknown)
            .unwrap();
        assert!(!unknown.success);
        assert_eq!(unknown.allowed_types, Some(vec!["txt".to_string()]));
    }
}
