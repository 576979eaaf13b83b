//! Testing utilities for exercising the fetcher without real mirrors.
//!
//! # Example
//!
//! ```rust,ignore
//! use mirrortube_core::testing::{fixtures, MockMirrorClient, MockResponse};
//!
//! let client = MockMirrorClient::new();
//! client.set_response("https://a.example", MockResponse::status(500, "")).await;
//! client
//!     .set_response("https://b.example", MockResponse::json(fixtures::video_payload("abc")))
//!     .await;
//!
//! // Hand `Arc::new(client)` to a FailoverFetcher...
//! ```

mod mock_mirror_client;

pub use mock_mirror_client::{MockMirrorClient, MockResponse, RecordedRequest, RequestKind};

/// Mirror payloads shaped like the upstream API.
pub mod fixtures {
    use serde_json::json;

    /// A `/videos/{id}` payload with two streams and one related video.
    pub fn video_payload(id: &str) -> String {
        json!({
            "title": format!("Video {}", id),
            "videoId": id,
            "lengthSeconds": 205,
            "descriptionHtml": "line one\nline two",
            "authorId": format!("UC{}", id),
            "author": format!("Author {}", id),
            "authorThumbnails": [
                {"url": "//img/small.jpg", "width": 32},
                {"url": "https://img/large.jpg", "width": 176},
            ],
            "viewCount": 1000,
            "likeCount": 10,
            "subCountText": "1.2K",
            "formatStreams": [
                {"url": format!("https://cdn.example/{}-360.mp4", id), "type": "video/mp4"},
                {"url": format!("https://cdn.example/{}-720.mp4", id), "type": "video/mp4"},
            ],
            "recommendedVideos": [{
                "videoId": format!("{}-next", id),
                "title": "Up next",
                "authorId": "UCother",
                "author": "Other",
                "lengthSeconds": 59,
                "viewCountText": "12 views",
            }],
        })
        .to_string()
    }

    /// A `/channels/{id}` payload with `videos` latest uploads.
    pub fn channel_payload(id: &str, videos: usize) -> String {
        let latest: Vec<_> = (0..videos)
            .map(|i| {
                json!({
                    "videoId": format!("{}-{}", id, i),
                    "title": format!("Upload {}", i),
                    "lengthSeconds": 300 + i,
                    "viewCountText": format!("{} views", i * 10),
                    "publishedText": "2 days ago",
                })
            })
            .collect();

        json!({
            "author": format!("Channel {}", id),
            "authorId": id,
            "authorThumbnails": [
                {"url": "https://img/icon-small.jpg"},
                {"url": "https://img/icon-large.jpg"},
            ],
            "authorBanners": [{"url": "https://img/banner.jpg"}],
            "descriptionHtml": "About\nthis channel",
            "subCount": 42,
            "latestVideos": latest,
        })
        .to_string()
    }

    /// A `/playlists/{id}` payload with `videos` entries.
    pub fn playlist_payload(id: &str, videos: usize) -> String {
        let entries: Vec<_> = (0..videos)
            .map(|i| {
                json!({
                    "videoId": format!("{}-{}", id, i),
                    "title": format!("Track {}", i),
                    "authorId": "UCcurator",
                    "author": "Curator",
                    "lengthSeconds": 120,
                })
            })
            .collect();

        json!({
            "playlistId": id,
            "title": format!("Playlist {}", id),
            "author": "Curator",
            "videos": entries,
        })
        .to_string()
    }

    /// A `/search` payload with one result of each kind.
    pub fn search_payload() -> String {
        json!([
            {
                "type": "video",
                "videoId": "vid1",
                "title": "First result",
                "authorId": "UCchan",
                "author": "Some Channel",
                "lengthSeconds": 4000,
                "viewCountText": "3 views",
                "publishedText": "1 year ago",
            },
            {
                "type": "channel",
                "authorId": "UCchan",
                "author": "Some Channel",
                "authorThumbnails": [{"url": "//img/chan.jpg"}],
                "subCount": 900,
                "description": "We upload things",
            },
            {
                "type": "playlist",
                "playlistId": "PLlist",
                "title": "Best of",
                "author": "Some Channel",
                "playlistThumbnail": "https://img/pl.jpg",
                "videoCount": 12,
            },
        ])
        .to_string()
    }

    /// A `/comments/{id}` payload with `count` comments.
    pub fn comments_payload(count: usize) -> String {
        let comments: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "author": format!("User {}", i),
                    "authorId": format!("UCuser{}", i),
                    "authorThumbnails": [
                        {"url": "https://img/user-small.jpg"},
                        {"url": "https://img/user-large.jpg"},
                    ],
                    "contentHtml": format!("First\ncomment {}", i),
                    "content": format!("First comment {}", i),
                    "likeCount": i,
                    "publishedText": "1 day ago",
                })
            })
            .collect();

        json!({"videoId": "abc", "comments": comments}).to_string()
    }
}
