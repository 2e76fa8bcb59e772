//! Classify command - run a local file through the pipeline offline

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;

use crate::api::types::{ApiError, ErrorEnvelope, SuccessEnvelope};
use crate::config::AppConfig;
use crate::domain::{RawIntake, SourceTransport};
use crate::infrastructure::extraction::ExtractionPipeline;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// File to classify
    pub path: PathBuf,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    pub compact: bool,
}

pub async fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    let envelope = classify_bytes(&config, bytes, file_name(&args.path));

    let rendered = if args.compact {
        serde_json::to_string(&envelope)?
    } else {
        serde_json::to_string_pretty(&envelope)?
    };

    println!("{rendered}");

    Ok(())
}

/// Run bytes through the pipeline and render the same envelope the server returns
pub fn classify_bytes(
    config: &AppConfig,
    bytes: Vec<u8>,
    file_name: Option<String>,
) -> serde_json::Value {
    let start = Instant::now();
    let pipeline = ExtractionPipeline::from_config(&config.extraction.pipeline_config());
    let intake = RawIntake::new(bytes, file_name, SourceTransport::Multipart);

    let rendered = match pipeline.process(&intake) {
        Ok(result) if result.success => {
            serde_json::to_value(SuccessEnvelope::new(result, start.elapsed()))
        }
        Ok(rejected) => {
            let error = ApiError::rejection(rejected).with_execution_time(start.elapsed());
            serde_json::to_value(error_envelope(error))
        }
        Err(e) => {
            let error = ApiError::from(e).with_execution_time(start.elapsed());
            serde_json::to_value(error_envelope(error))
        }
    };

    rendered.unwrap_or_else(|e| serde_json::json!({ "success": false, "error": e.to_string() }))
}

fn error_envelope(error: ApiError) -> ErrorEnvelope {
    ErrorEnvelope::new(error.detail, error.execution_time)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
