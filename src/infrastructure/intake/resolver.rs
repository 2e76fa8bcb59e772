//! Transport resolver
//!
//! Turns one request body into a [`RawIntake`]. JSON bodies are dispatched on
//! `fileUrl`, `fileBase64` and `binaryData` in that order; multipart uploads are
//! searched for the `file`, `resume` and `document` fields in that order.

use std::sync::Arc;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{DomainError, RawIntake, SizeGuard, SourceTransport};
use crate::infrastructure::http::RemoteFetcher;

/// Multipart fields searched for an uploaded file, in priority order
pub const UPLOAD_FIELDS: &[&str] = &["file", "resume", "document"];

/// File name used for downloads whose URL has no usable path segment
pub const DOWNLOAD_PLACEHOLDER_NAME: &str = "downloaded-file";

/// Standard alphabet, padding optional
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// JSON request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTextRequest {
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_base64: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub binary_data: Option<Value>,
}

/// One file field read from a multipart body
#[derive(Debug, Clone)]
pub struct UploadedPart {
    pub field_name: String,
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Resolves request bodies into raw intakes
#[derive(Clone)]
pub struct TransportResolver {
    fetcher: Arc<dyn RemoteFetcher>,
    guard: SizeGuard,
}

impl TransportResolver {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, guard: SizeGuard) -> Self {
        Self { fetcher, guard }
    }

    pub fn size_guard(&self) -> SizeGuard {
        self.guard
    }

    /// Resolve a JSON body
    pub async fn resolve_json(&self, body: &[u8]) -> Result<RawIntake, DomainError> {
        let request = parse_json_body(body)?;

        if let Some(url) = non_empty(request.file_url.as_deref()) {
            debug!(url = %url, "Resolving file from URL");

            let fetched = self.fetcher.fetch(url, self.guard).await?;
            let file_name = fetched
                .file_name
                .unwrap_or_else(|| DOWNLOAD_PLACEHOLDER_NAME.to_string());

            return Ok(RawIntake::new(
                fetched.bytes,
                Some(file_name),
                SourceTransport::Url,
            ));
        }

        if let Some(encoded) = non_empty(request.file_base64.as_deref()) {
            debug!(encoded_len = encoded.len(), "Resolving file from base64");

            let bytes = decode_base64(encoded)?;
            return Ok(RawIntake::new(
                bytes,
                request.file_name,
                SourceTransport::Base64,
            ));
        }

        if let Some(binary) = request.binary_data.as_ref().filter(|v| !v.is_null()) {
            debug!("Resolving file from binary data");

            let bytes = decode_binary_data(binary)?;
            return Ok(RawIntake::new(
                bytes,
                request.file_name,
                SourceTransport::BinaryData,
            ));
        }

        Err(DomainError::MissingFileData)
    }

    /// Resolve the file fields of a multipart body
    pub fn resolve_upload(&self, parts: Vec<UploadedPart>) -> Result<RawIntake, DomainError> {
        let mut parts = parts;

        for field in UPLOAD_FIELDS {
            if let Some(index) = parts.iter().position(|p| p.field_name == *field) {
                let part = parts.swap_remove(index);

                debug!(
                    field = %part.field_name,
                    file_name = ?part.file_name,
                    bytes = part.bytes.len(),
                    "Resolved multipart upload"
                );

                return Ok(RawIntake::new(
                    part.bytes,
                    part.file_name,
                    SourceTransport::Multipart,
                ));
            }
        }

        Err(DomainError::no_file_provided(UPLOAD_FIELDS))
    }
}

impl std::fmt::Debug for TransportResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResolver")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

/// Parse a body that must be a single JSON object
pub fn parse_json_body(body: &[u8]) -> Result<ExtractTextRequest, DomainError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| DomainError::invalid_body(format!("Invalid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(DomainError::invalid_body("Expected a JSON object"));
    }

    serde_json::from_value(value)
        .map_err(|e| DomainError::invalid_body(format!("Invalid request fields: {}", e)))
}

/// Decode a base64 payload
///
/// Standard alphabet only. Accepts an optional `data:<mime>;base64,` prefix,
/// embedded whitespace and missing padding.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, DomainError> {
    let payload = match input.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| DomainError::invalid_encoding("Data URL is not base64 encoded"))?,
        None => input,
    };

    let normalized: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = LENIENT_BASE64
        .decode(normalized.as_bytes())
        .map_err(|e| DomainError::invalid_encoding(format!("Invalid base64: {}", e)))?;

    if bytes.is_empty() {
        return Err(DomainError::invalid_encoding("Base64 payload decoded to zero bytes"));
    }

    Ok(bytes)
}

/// Decode `binaryData`: `{"data": [..]}` or a bare array of byte values
pub fn decode_binary_data(value: &Value) -> Result<Vec<u8>, DomainError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(DomainError::invalid_encoding(
                    "binaryData object must contain a 'data' array",
                ));
            }
        },
        _ => {
            return Err(DomainError::invalid_encoding(
                "binaryData must be an array of byte values",
            ));
        }
    };

    if items.is_empty() {
        return Err(DomainError::invalid_encoding("binaryData is empty"));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| {
                    DomainError::invalid_encoding(format!(
                        "binaryData[{}] is not a byte value (0-255)",
                        index
                    ))
                })
        })
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
