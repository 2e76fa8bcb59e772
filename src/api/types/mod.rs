//! Wire types for the extraction endpoint

pub mod envelope;
pub mod error;

pub use envelope::{
    format_execution_time, ErrorDetail, ErrorEnvelope, ExtractionData, SuccessEnvelope,
};
pub use error::ApiError;
