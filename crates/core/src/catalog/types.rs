//! Display-ready structures produced from mirror payloads.

use serde::{Deserialize, Serialize};

/// Text used in the placeholder entry when related items are missing.
pub const LOAD_FAILED: &str = "Load Failed";

/// One video in a list (related videos, search results, channel uploads).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub author_id: String,
    pub author: String,
    pub length_text: String,
    pub view_count_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_text: Option<String>,
}

impl VideoSummary {
    /// Stand-in shown when a mirror omits related videos entirely.
    pub fn load_failed() -> Self {
        Self {
            video_id: LOAD_FAILED.to_string(),
            title: LOAD_FAILED.to_string(),
            author_id: LOAD_FAILED.to_string(),
            author: LOAD_FAILED.to_string(),
            length_text: super::format::length_text(0),
            view_count_text: LOAD_FAILED.to_string(),
            published_text: None,
        }
    }
}

/// Watch page payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPage {
    pub video: VideoDetail,
    pub recommended: Vec<VideoSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetail {
    /// At most two stream URLs, last listed stream first.
    pub video_urls: Vec<String>,
    pub description_html: String,
    pub title: String,
    pub length_text: String,
    pub author_id: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_thumbnail_url: Option<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub subscribers_count: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub query: String,
    pub page: u32,
    pub results: Vec<SearchItem>,
    /// Route of the following results page.
    pub next: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchItem {
    Video(VideoSummary),
    Channel(ChannelSummary),
    Playlist(PlaylistSummary),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub author_id: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub subscribers_count: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub playlist_id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub video_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelPage {
    pub channel_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_icon: Option<String>,
    pub channel_profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_banner: Option<String>,
    pub subscribers_count: String,
    pub videos: Vec<VideoSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistPage {
    pub playlist_id: String,
    pub title: String,
    pub author: String,
    pub page: u32,
    pub videos: Vec<VideoSummary>,
    pub next: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_icon: Option<String>,
    pub content_html: String,
    pub like_count: u64,
    pub published_text: String,
}
