//! Failover integration tests.
//!
//! These drive `FailoverFetcher` against scripted mirrors and check the
//! returned payload, the requests made, and the resulting queue order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mirrortube_core::{
    testing::{fixtures, MockMirrorClient, MockResponse, RequestKind},
    Capability, FailoverFetcher, FetchConfig, FetchError, MirrorList, MirrorRegistry,
    StaticIdentity, TransportError,
};

const A: &str = "https://a.example";
const B: &str = "https://b.example";
const C: &str = "https://c.example";

struct Harness {
    client: Arc<MockMirrorClient>,
    registry: Arc<MirrorRegistry>,
    fetcher: Arc<FailoverFetcher>,
}

impl Harness {
    fn new(capability: Capability, mirrors: &[&str], config: FetchConfig) -> Self {
        let client = Arc::new(MockMirrorClient::new());
        let list = MirrorList::new().with(capability, mirrors.iter().copied());
        let registry = Arc::new(MirrorRegistry::new(list));
        let fetcher = Arc::new(FailoverFetcher::new(
            config,
            Arc::clone(&registry),
            client.clone(),
            Arc::new(StaticIdentity::new("integration-test")),
        ));

        Self {
            client,
            registry,
            fetcher,
        }
    }

    async fn order(&self, capability: Capability) -> Vec<String> {
        self.registry.queue(capability).peek().await
    }
}

fn fast_config() -> FetchConfig {
    FetchConfig {
        max_total_ms: 2000,
        safety_margin_ms: 100,
        ..FetchConfig::default()
    }
}

#[tokio::test]
async fn test_skips_broken_mirrors_and_reorders_queue() {
    let h = Harness::new(Capability::Channel, &[A, B, C], fast_config());
    h.client.set_response(A, MockResponse::status(500, "oops")).await;
    h.client
        .set_response(B, MockResponse::json(r#"{"error": "rate limited"}"#))
        .await;
    h.client
        .set_response(C, MockResponse::json(fixtures::channel_payload("UC1", 3)))
        .await;

    let payload = h
        .fetcher
        .fetch(Capability::Channel, "/channels/UC1")
        .await
        .unwrap();

    assert!(payload.contains("Channel UC1"));
    assert_eq!(h.order(Capability::Channel).await, vec![C, A, B]);
    assert_eq!(
        h.client.requested_urls().await,
        vec![
            "https://a.example/api/v1/channels/UC1",
            "https://b.example/api/v1/channels/UC1",
            "https://c.example/api/v1/channels/UC1",
        ]
    );
}

#[tokio::test]
async fn test_working_mirror_stays_at_head() {
    let h = Harness::new(Capability::Video, &[A, B], fast_config());
    h.client
        .set_response(A, MockResponse::json(fixtures::video_payload("x")))
        .await;

    for _ in 0..3 {
        h.fetcher.fetch(Capability::Video, "/videos/x").await.unwrap();
    }

    assert_eq!(h.order(Capability::Video).await, vec![A, B]);
    assert_eq!(h.client.request_count().await, 3);
}

#[tokio::test]
async fn test_all_mirrors_failing_exhausts_budget() {
    let h = Harness::new(Capability::Search, &[A, B, C], fast_config());
    h.client
        .set_response(A, MockResponse::failure(TransportError::Timeout))
        .await;
    // B and C are unscripted and fail to connect.

    let err = h
        .fetcher
        .fetch(Capability::Search, "/search?q=x&page=1&hl=jp")
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::BudgetExhausted(Capability::Search));
    // Every mirror tried exactly once, each demoted in turn.
    assert_eq!(h.client.request_count().await, 3);
    assert_eq!(h.order(Capability::Search).await, vec![A, B, C]);
}

#[tokio::test]
async fn test_empty_queue_fails_without_requests() {
    let h = Harness::new(Capability::Playlist, &[A], fast_config());

    let err = h
        .fetcher
        .fetch(Capability::Comments, "/comments/x?hl=jp")
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::NoMirrors(Capability::Comments));
    assert_eq!(h.client.request_count().await, 0);
}

#[tokio::test]
async fn test_single_mirror_failing_is_tried_once() {
    let h = Harness::new(Capability::Video, &[A], fast_config());
    h.client.set_response(A, MockResponse::status(404, "")).await;

    let err = h.fetcher.fetch(Capability::Video, "/videos/x").await.unwrap_err();

    assert_eq!(err, FetchError::BudgetExhausted(Capability::Video));
    assert_eq!(h.client.request_count().await, 1);
    assert_eq!(h.order(Capability::Video).await, vec![A]);
}

#[tokio::test]
async fn test_no_attempt_started_inside_safety_margin() {
    let config = FetchConfig {
        max_total_ms: 500,
        safety_margin_ms: 0,
        ..FetchConfig::default()
    };
    let h = Harness::new(Capability::Video, &[A, B, C], config);
    let slow_failure = MockResponse::status(503, "").with_delay(Duration::from_millis(300));
    h.client.set_response(A, slow_failure.clone()).await;
    h.client.set_response(B, slow_failure.clone()).await;
    h.client.set_response(C, slow_failure).await;

    let err = h.fetcher.fetch(Capability::Video, "/videos/x").await.unwrap_err();

    assert_eq!(err, FetchError::BudgetExhausted(Capability::Video));
    // The second attempt starts at ~300ms and overruns; no third starts.
    assert_eq!(h.client.request_count().await, 2);
    assert_eq!(h.order(Capability::Video).await, vec![C, A, B]);
}

#[tokio::test]
async fn test_strict_media_check_rejects_non_video_stream() {
    let config = FetchConfig {
        strict_media_check: true,
        ..fast_config()
    };
    let h = Harness::new(Capability::Video, &[A, B], config);
    h.client
        .set_response(A, MockResponse::json(fixtures::video_payload("a")))
        .await;
    h.client
        .set_response(B, MockResponse::json(fixtures::video_payload("b")))
        .await;
    h.client
        .set_media_content_type("https://cdn.example/a-", Some("text/html"))
        .await;
    h.client
        .set_media_content_type("https://cdn.example/b-", Some("video/mp4"))
        .await;

    let payload = h.fetcher.fetch(Capability::Video, "/videos/x").await.unwrap();

    assert!(payload.contains("Video b"));
    assert_eq!(h.order(Capability::Video).await, vec![B, A]);

    let media_checks: Vec<String> = h
        .client
        .requests()
        .await
        .into_iter()
        .filter(|r| r.kind == RequestKind::MediaCheck)
        .map(|r| r.url)
        .collect();
    assert_eq!(
        media_checks,
        vec![
            "https://cdn.example/a-360.mp4",
            "https://cdn.example/b-360.mp4",
        ]
    );
}

fn strict_config() -> FetchConfig {
    FetchConfig {
        strict_media_check: true,
        ..fast_config()
    }
}

/// Strict harness where B always serves a playable video.
async fn strict_harness_with_fallback(config: FetchConfig) -> Harness {
    let h = Harness::new(Capability::Video, &[A, B], config);
    h.client
        .set_response(B, MockResponse::json(fixtures::video_payload("b")))
        .await;
    h.client
        .set_media_content_type("https://cdn.example/b-", Some("video/mp4"))
        .await;
    h
}

fn video_payload_with_streams(id: &str, streams: Option<serde_json::Value>) -> String {
    let mut value: serde_json::Value =
        serde_json::from_str(&fixtures::video_payload(id)).unwrap();
    match streams {
        Some(streams) => value["formatStreams"] = streams,
        None => {
            value.as_object_mut().unwrap().remove("formatStreams");
        }
    }
    value.to_string()
}

async fn media_check_urls(client: &MockMirrorClient) -> Vec<String> {
    client
        .requests()
        .await
        .into_iter()
        .filter(|r| r.kind == RequestKind::MediaCheck)
        .map(|r| r.url)
        .collect()
}

#[tokio::test]
async fn test_strict_media_check_demotes_on_stream_transport_failure() {
    let h = strict_harness_with_fallback(strict_config()).await;
    h.client
        .set_response(A, MockResponse::json(fixtures::video_payload("a")))
        .await;
    h.client
        .set_media_reply(
            "https://cdn.example/a-",
            MockResponse::failure(TransportError::Connect("reset by peer".into())),
        )
        .await;

    let payload = h.fetcher.fetch(Capability::Video, "/videos/x").await.unwrap();

    assert!(payload.contains("Video b"));
    assert_eq!(h.order(Capability::Video).await, vec![B, A]);
    assert_eq!(
        media_check_urls(&h.client).await,
        vec![
            "https://cdn.example/a-360.mp4",
            "https://cdn.example/b-360.mp4",
        ]
    );
}

#[tokio::test]
async fn test_strict_media_check_demotes_payload_without_streams() {
    for streams in [None, Some(serde_json::json!([]))] {
        let h = strict_harness_with_fallback(strict_config()).await;
        h.client
            .set_response(
                A,
                MockResponse::json(video_payload_with_streams("a", streams.clone())),
            )
            .await;

        let payload = h.fetcher.fetch(Capability::Video, "/videos/x").await.unwrap();

        assert!(payload.contains("Video b"), "streams: {:?}", streams);
        assert_eq!(h.order(Capability::Video).await, vec![B, A]);
        // Nothing to check on A, so only B's stream is requested.
        assert_eq!(
            media_check_urls(&h.client).await,
            vec!["https://cdn.example/b-360.mp4"]
        );
    }
}

#[tokio::test]
async fn test_strict_media_check_demotes_missing_content_type() {
    let h = strict_harness_with_fallback(strict_config()).await;
    h.client
        .set_response(A, MockResponse::json(fixtures::video_payload("a")))
        .await;
    h.client
        .set_media_content_type("https://cdn.example/a-", None)
        .await;

    let payload = h.fetcher.fetch(Capability::Video, "/videos/x").await.unwrap();

    assert!(payload.contains("Video b"));
    assert_eq!(h.order(Capability::Video).await, vec![B, A]);
}

#[tokio::test]
async fn test_strict_media_check_is_bounded_by_fetch_deadline() {
    let config = FetchConfig {
        strict_media_check: true,
        max_total_ms: 600,
        safety_margin_ms: 100,
        ..FetchConfig::default()
    };
    let h = strict_harness_with_fallback(config).await;
    h.client
        .set_response(A, MockResponse::json(fixtures::video_payload("a")))
        .await;
    // A video answer that only arrives long after the budget is gone.
    h.client
        .set_media_reply(
            "https://cdn.example/a-",
            MockResponse::media("video/mp4").with_delay(Duration::from_secs(5)),
        )
        .await;

    let started = Instant::now();
    let err = h.fetcher.fetch(Capability::Video, "/videos/x").await.unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(err, FetchError::BudgetExhausted(Capability::Video));
    assert!(
        elapsed < Duration::from_millis(1000),
        "fetch took {:?}",
        elapsed
    );
    assert_eq!(h.order(Capability::Video).await, vec![B, A]);
    // The budget ran out on A, so B was never asked.
    assert_eq!(
        h.client.requested_urls().await,
        vec!["https://a.example/api/v1/videos/x"]
    );
}

#[tokio::test]
async fn test_media_check_only_applies_to_video() {
    let config = FetchConfig {
        strict_media_check: true,
        ..fast_config()
    };
    let h = Harness::new(Capability::Comments, &[A], config);
    h.client
        .set_response(A, MockResponse::json(fixtures::comments_payload(1)))
        .await;

    h.fetcher
        .fetch(Capability::Comments, "/comments/x?hl=jp")
        .await
        .unwrap();

    assert_eq!(h.client.request_count().await, 1);
}

#[tokio::test]
async fn test_concurrent_fetches_share_the_queue() {
    let h = Harness::new(Capability::Video, &[A, B], fast_config());
    h.client
        .set_response(
            A,
            MockResponse::status(500, "").with_delay(Duration::from_millis(20)),
        )
        .await;
    h.client
        .set_response(B, MockResponse::json(fixtures::video_payload("x")))
        .await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let fetcher = Arc::clone(&h.fetcher);
            tokio::spawn(async move { fetcher.fetch(Capability::Video, "/videos/x").await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    // Whatever the interleaving, the queue still holds each mirror once.
    let order = h.order(Capability::Video).await;
    assert_eq!(order.len(), 2);
    assert!(order.contains(&A.to_string()));
    assert!(order.contains(&B.to_string()));

    // Once B is at the head, a new fetch goes straight to it.
    h.client.clear_recorded().await;
    if order[0] == B {
        h.fetcher.fetch(Capability::Video, "/videos/x").await.unwrap();
        assert_eq!(h.client.request_count().await, 1);
    }
}
