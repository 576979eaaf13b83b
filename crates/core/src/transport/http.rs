//! reqwest-backed mirror client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use crate::config::FetchConfig;

use super::{MirrorClient, MirrorResponse, TransportError};

/// Mirror client with separate timeout pairs for API calls and media checks.
///
/// reqwest has no standalone read timeout on the request path, so each
/// client's total timeout is its connect timeout plus its read timeout.
pub struct HttpMirrorClient {
    api: Client,
    media: Client,
}

impl HttpMirrorClient {
    pub fn new(config: &FetchConfig) -> Result<Self, TransportError> {
        let api = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.connect_timeout() + config.read_timeout())
            .build()?;

        let media = Client::builder()
            .connect_timeout(config.media_connect_timeout())
            .timeout(config.media_connect_timeout() + config.media_read_timeout())
            .build()?;

        Ok(Self { api, media })
    }
}

#[async_trait]
impl MirrorClient for HttpMirrorClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn get(&self, url: &str, headers: HeaderMap) -> Result<MirrorResponse, TransportError> {
        let response = self.api.get(url).headers(headers).send().await?;

        let status = response.status().as_u16();
        let content_type = content_type(response.headers());
        let body = response.text().await?;

        debug!(url = url, status = status, bytes = body.len(), "Mirror responded");

        Ok(MirrorResponse {
            status,
            content_type,
            body,
        })
    }

    async fn probe_content_type(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Option<String>, TransportError> {
        let response = self.media.get(url).headers(headers).send().await?;
        Ok(content_type(response.headers()))
    }
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
