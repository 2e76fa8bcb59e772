//! Application services

mod extraction_service;

pub use extraction_service::{ExtractionOutcome, ExtractionService};
