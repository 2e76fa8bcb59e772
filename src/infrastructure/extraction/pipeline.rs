//! Classification and dispatch pipeline

use crate::domain::classification::{ClassificationTag, Classifier};
use crate::domain::extraction::{ExtractionResult, SizeGuard};
use crate::domain::{DomainError, RawIntake};

use super::dispatcher::HandlerDispatcher;

/// Settings for building a pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_file_size: u64,
    pub max_text_length: usize,
    pub allowed_extensions: Vec<String>,
}

/// Size check, classification and dispatch for one intake
///
/// Holds no per-request state; one instance serves every request.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    guard: SizeGuard,
    classifier: Classifier,
    dispatcher: HandlerDispatcher,
}

impl ExtractionPipeline {
    pub fn new(guard: SizeGuard, classifier: Classifier, dispatcher: HandlerDispatcher) -> Self {
        Self {
            guard,
            classifier,
            dispatcher,
        }
    }

    /// Build the standard pipeline from settings
    pub fn from_config(config: &PipelineConfig) -> Self {
        let guard = SizeGuard::new(config.max_file_size);

        Self::new(
            guard,
            Classifier::new(&config.allowed_extensions),
            HandlerDispatcher::standard(
                guard,
                config.max_text_length,
                config.allowed_extensions.clone(),
            ),
        )
    }

    pub fn size_guard(&self) -> SizeGuard {
        self.guard
    }

    /// Post-assembly size check followed by classification
    pub fn classify(&self, intake: &RawIntake) -> Result<ClassificationTag, DomainError> {
        self.guard.check_assembled(intake.len())?;

        Ok(self.classifier.classify(intake.buffer(), intake.file_name()))
    }

    /// Run the handler for an already classified intake
    pub fn dispatch(
        &self,
        intake: &RawIntake,
        tag: ClassificationTag,
    ) -> Result<ExtractionResult, DomainError> {
        self.dispatcher.dispatch(intake, tag)
    }

    /// Classify and dispatch in one step
    pub fn process(&self, intake: &RawIntake) -> Result<ExtractionResult, DomainError> {
        let tag = self.classify(intake)?;
        self.dispatch(intake, tag)
    }
}
