//! Mock mirror client for testing.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, USER_AGENT};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::transport::{MirrorClient, MirrorResponse, TransportError};

/// Which client method a recorded request went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Api,
    MediaCheck,
}

/// A recorded request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub kind: RequestKind,
    pub url: String,
    pub user_agent: Option<String>,
    /// When the request was made.
    pub timestamp: std::time::Instant,
}

/// Scripted reply for a mirror.
#[derive(Debug, Clone)]
pub struct MockResponse {
    result: Result<MirrorResponse, TransportError>,
    delay: Option<Duration>,
}

impl MockResponse {
    /// 200 with a JSON content type.
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            result: Ok(MirrorResponse {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: body.into(),
            }),
            delay: None,
        }
    }

    /// Arbitrary status with a body.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            result: Ok(MirrorResponse {
                status,
                content_type: Some("application/json".to_string()),
                body: body.into(),
            }),
            delay: None,
        }
    }

    /// 200 with the given content type and no body, as a media host answers.
    pub fn media(content_type: &str) -> Self {
        Self {
            result: Ok(MirrorResponse {
                status: 200,
                content_type: Some(content_type.to_string()),
                body: String::new(),
            }),
            delay: None,
        }
    }

    /// Fail at the transport level.
    pub fn failure(error: TransportError) -> Self {
        Self {
            result: Err(error),
            delay: None,
        }
    }

    /// Wait this long before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Mock implementation of the MirrorClient trait.
///
/// Replies are matched by URL prefix (longest prefix wins), so scripting a
/// mirror's base URL covers every path on it. Unscripted URLs fail with a
/// connection error, like an unreachable host.
///
/// # Example
///
/// ```rust,ignore
/// use mirrortube_core::testing::{MockMirrorClient, MockResponse};
///
/// let client = MockMirrorClient::new();
/// client.set_response("https://a.example/", MockResponse::status(500, "")).await;
/// client.set_response("https://b.example/", MockResponse::json(r#"{"title": "t"}"#)).await;
///
/// // ... run a fetch ...
///
/// assert_eq!(client.requested_urls().await.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockMirrorClient {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    media: Arc<RwLock<HashMap<String, MockResponse>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl MockMirrorClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply for every API URL starting with `prefix`.
    pub async fn set_response(&self, prefix: &str, response: MockResponse) {
        self.responses
            .write()
            .await
            .insert(prefix.to_string(), response);
    }

    /// Script the content type reported for stream URLs starting with `prefix`.
    pub async fn set_media_content_type(&self, prefix: &str, content_type: Option<&str>) {
        let response = MockResponse {
            result: Ok(MirrorResponse {
                status: 200,
                content_type: content_type.map(str::to_string),
                body: String::new(),
            }),
            delay: None,
        };
        self.media.write().await.insert(prefix.to_string(), response);
    }

    /// Script an arbitrary stream reply (e.g. a failure or a delay).
    pub async fn set_media_reply(&self, prefix: &str, response: MockResponse) {
        self.media.write().await.insert(prefix.to_string(), response);
    }

    /// All recorded requests, in order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// URLs of recorded API requests, in order.
    pub async fn requested_urls(&self) -> Vec<String> {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.kind == RequestKind::Api)
            .map(|r| r.url.clone())
            .collect()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn clear_recorded(&self) {
        self.requests.write().await.clear();
    }

    async fn record(&self, kind: RequestKind, url: &str, headers: &HeaderMap) {
        self.requests.write().await.push(RecordedRequest {
            kind,
            url: url.to_string(),
            user_agent: headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            timestamp: std::time::Instant::now(),
        });
    }

    async fn reply(
        table: &RwLock<HashMap<String, MockResponse>>,
        url: &str,
    ) -> Result<MirrorResponse, TransportError> {
        let scripted = table
            .read()
            .await
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, response)| response.clone());

        let Some(response) = scripted else {
            return Err(TransportError::Connect(format!("no route to {}", url)));
        };

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }
        response.result
    }
}

#[async_trait]
impl MirrorClient for MockMirrorClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get(&self, url: &str, headers: HeaderMap) -> Result<MirrorResponse, TransportError> {
        self.record(RequestKind::Api, url, &headers).await;
        Self::reply(&self.responses, url).await
    }

    async fn probe_content_type(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Option<String>, TransportError> {
        self.record(RequestKind::MediaCheck, url, &headers).await;
        Self::reply(&self.media, url)
            .await
            .map(|response| response.content_type)
    }
}
