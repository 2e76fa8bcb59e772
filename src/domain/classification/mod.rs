//! File type classification

mod classifier;
mod tag;

pub use classifier::{
    file_extension, is_printable_text, ClassificationRule, Classifier, DEFAULT_ALLOWED_EXTENSIONS,
    DEFAULT_PRINTABLE_RATIO, SIGNATURES, SIGNATURE_WINDOW,
};
pub use tag::ClassificationTag;
