use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::Url;
use tracing::debug;

use crate::domain::{DomainError, SizeGuard};

#[cfg(test)]
use mockall::automock;

/// Default download timeout in seconds
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// File downloaded from a remote URL
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub bytes: Bytes,
    /// Last non-empty path segment of the URL
    pub file_name: Option<String>,
}

/// Trait for remote file downloads (for mocking)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Download `url`, aborting as soon as the body exceeds the guard's limit
    ///
    /// On overflow `FileTooLarge::actual` is the declared `Content-Length` when the
    /// server sends one, otherwise the bytes received when the transfer was cut.
    async fn fetch(&self, url: &str, guard: SizeGuard) -> Result<FetchedFile, DomainError>;
}

/// Real fetcher using reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    fn map_transport_error(&self, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            return DomainError::download_failed(format!(
                "Request timed out after {}s",
                self.timeout.as_secs()
            ));
        }

        DomainError::download_failed(format!("Request failed: {}", error))
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, guard: SizeGuard) -> Result<FetchedFile, DomainError> {
        let parsed = Url::parse(url)
            .map_err(|e| DomainError::download_failed(format!("Invalid URL: {}", e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::download_failed(format!(
                "Unsupported protocol: {}",
                parsed.scheme()
            )));
        }

        let file_name = file_name_from_url(&parsed);

        debug!(url = %parsed, max_bytes = guard.max_bytes(), "Downloading remote file");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            return Err(DomainError::download_failed(format!("HTTP {}", status)));
        }

        // Reports the declared length, before any body bytes are read
        if let Some(declared) = response.content_length() {
            guard.check_streamed(declared)?;
        }

        let mut stream = response.bytes_stream();
        let mut buffer = BytesMut::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.map_transport_error(e))?;

            // Returning here drops the stream and aborts the transfer
            guard.check_streamed((buffer.len() + chunk.len()) as u64)?;
            buffer.extend_from_slice(&chunk);
        }

        debug!(bytes = buffer.len(), "Remote file downloaded");

        Ok(FetchedFile {
            bytes: buffer.freeze(),
            file_name,
        })
    }
}

fn file_name_from_url(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}
