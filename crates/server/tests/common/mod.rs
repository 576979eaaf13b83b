//! Common test utilities for E2E testing with mocks.
//!
//! [`TestFixture`] builds the real router over a fetcher whose mirrors are
//! served by a `MockMirrorClient`, so every page route can be driven
//! in-process without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use mirrortube_core::{
    testing::MockMirrorClient, Capability, FailoverFetcher, FetchConfig, MirrorList,
    MirrorRegistry, StaticIdentity, VideoCatalog,
};
use mirrortube_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use mirrortube_core::testing::fixtures;
pub use mirrortube_core::testing::MockResponse;

pub const MIRROR_A: &str = "https://a.example";
pub const MIRROR_B: &str = "https://b.example";

pub struct TestFixture {
    pub router: Router,
    /// Scripted mirrors - every capability uses [MIRROR_A, MIRROR_B] by default
    pub client: Arc<MockMirrorClient>,
    pub registry: Arc<MirrorRegistry>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let mut list = MirrorList::new();
        for capability in Capability::ALL {
            list.insert(
                capability,
                vec![MIRROR_A.to_string(), MIRROR_B.to_string()],
            );
        }
        Self::with_mirrors(list, test_fetch_config())
    }

    pub fn with_mirrors(list: MirrorList, fetch: FetchConfig) -> Self {
        let client = Arc::new(MockMirrorClient::new());
        let registry = Arc::new(MirrorRegistry::new(list));
        let fetcher = Arc::new(FailoverFetcher::new(
            fetch,
            Arc::clone(&registry),
            client.clone(),
            Arc::new(StaticIdentity::new("e2e-test")),
        ));

        let state = Arc::new(AppState::new(VideoCatalog::new(fetcher)));

        Self {
            router: create_router(state),
            client,
            registry,
        }
    }

    /// Send a GET request and parse the JSON body (Null if empty or not JSON).
    pub async fn get(&self, uri: &str) -> TestResponse {
        let (status, text) = self.get_text(uri).await;
        TestResponse {
            status,
            body: serde_json::from_str(&text).unwrap_or(Value::Null),
        }
    }

    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn order(&self, capability: Capability) -> Vec<String> {
        self.registry.queue(capability).peek().await
    }
}

pub fn test_fetch_config() -> FetchConfig {
    FetchConfig {
        max_total_ms: 2000,
        safety_margin_ms: 100,
        ..FetchConfig::default()
    }
}
