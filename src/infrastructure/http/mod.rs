//! Outbound HTTP

mod fetcher;

pub use fetcher::{FetchedFile, HttpFetcher, RemoteFetcher, DEFAULT_DOWNLOAD_TIMEOUT_SECS};

#[cfg(test)]
pub use fetcher::MockRemoteFetcher;
