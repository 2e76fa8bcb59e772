//! Content handler implementations

mod pdf;
mod rejection;
mod text;

pub use pdf::{printable_preview, PdfPreviewHandler, PLACEHOLDER_PAGE_COUNT, PREVIEW_BYTES};
pub use rejection::{DocumentRejectionHandler, ImageRejectionHandler, UnknownTypeHandler};
pub use text::{count_lines, TextHandler, TRUNCATION_NOTICE};
