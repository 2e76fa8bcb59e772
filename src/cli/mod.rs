//! CLI module for the text extraction gateway
//!
//! - `serve`: run the HTTP server
//! - `classify`: run a local file through the extraction pipeline

pub mod classify;
pub mod serve;

use clap::{Parser, Subcommand};

/// Text Extraction Gateway - classify files and return their text
#[derive(Parser)]
#[command(name = "text-extract-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Classify and extract a local file, printing the JSON envelope
    Classify(classify::ClassifyArgs),
}
