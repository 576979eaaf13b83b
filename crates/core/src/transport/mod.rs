//! HTTP transport to mirror servers.
//!
//! The fetcher talks to mirrors through the [`MirrorClient`] trait so the
//! failover loop can be exercised against scripted mirrors in tests.

mod http;

pub use http::HttpMirrorClient;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use thiserror::Error;

/// A completed HTTP exchange with a mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl MirrorResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to complete an exchange at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

#[async_trait]
pub trait MirrorClient: Send + Sync {
    /// Client name for logging.
    fn name(&self) -> &str;

    /// GET a mirror API URL with the short per-call timeouts.
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<MirrorResponse, TransportError>;

    /// GET a media stream URL and report its content type without reading
    /// the body. Uses the media timeouts.
    async fn probe_content_type(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Option<String>, TransportError>;
}
