//! Domain layer - Core types and rules of the extraction pipeline

pub mod classification;
pub mod error;
pub mod extraction;
pub mod intake;
pub mod rate_limit;

pub use classification::{ClassificationRule, ClassificationTag, Classifier};
pub use error::{DomainError, ErrorCategory};
pub use extraction::{ContentHandler, ExtractionMetadata, ExtractionResult, SizeGuard};
pub use intake::{RawIntake, SourceTransport};
pub use rate_limit::{RateLimitConfig, RateLimitDecision, RateLimitStore};
