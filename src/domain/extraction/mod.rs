//! Extraction domain
//!
//! Result records, the handler trait every content type implements, and the
//! size guard applied before and during dispatch.

mod handler;
mod limits;
mod result;

pub use handler::ContentHandler;
pub use limits::{SizeGuard, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_TEXT_LENGTH};
pub use result::{ExtractionMetadata, ExtractionResult};
