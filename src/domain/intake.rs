//! Raw intake produced by the transport resolver

use bytes::Bytes;
use serde::Serialize;

/// File name used when the request does not supply one
pub const PLACEHOLDER_FILE_NAME: &str = "uploaded-file";

/// Input transport a file arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTransport {
    Url,
    Base64,
    BinaryData,
    Multipart,
}

impl std::fmt::Display for SourceTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url => write!(f, "url"),
            Self::Base64 => write!(f, "base64"),
            Self::BinaryData => write!(f, "binary_data"),
            Self::Multipart => write!(f, "multipart"),
        }
    }
}

/// Bytes of one request's file, plus where they came from
///
/// Created once per request and never modified; every pipeline stage borrows it.
#[derive(Debug, Clone)]
pub struct RawIntake {
    buffer: Bytes,
    file_name: Option<String>,
    source: SourceTransport,
}

impl RawIntake {
    pub fn new(buffer: impl Into<Bytes>, file_name: Option<String>, source: SourceTransport) -> Self {
        Self {
            buffer: buffer.into(),
            file_name: file_name.filter(|name| !name.trim().is_empty()),
            source,
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// File name to report back, falling back to the placeholder
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(PLACEHOLDER_FILE_NAME)
    }

    pub fn source(&self) -> SourceTransport {
        self.source
    }
}
