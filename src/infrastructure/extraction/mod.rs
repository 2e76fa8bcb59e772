//! Content handlers, dispatch and the extraction pipeline

mod dispatcher;
pub mod handlers;
mod pipeline;

pub use dispatcher::HandlerDispatcher;
pub use pipeline::{ExtractionPipeline, PipelineConfig};
