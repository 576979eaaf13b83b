//! Playlist page mapping.

use serde::Deserialize;

use crate::capability::Capability;

use super::format::{extract, length_text, parse_payload};
use super::types::VideoSummary;
use super::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistPayload {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    videos: Vec<PlaylistVideo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistVideo {
    video_id: String,
    title: String,
    #[serde(default)]
    author_id: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    length_seconds: u64,
    #[serde(default)]
    view_count_text: String,
}

pub(crate) fn map_playlist(body: &str) -> Result<(PlaylistPayload, Vec<VideoSummary>), CatalogError> {
    let value = parse_payload(Capability::Playlist, body)?;
    let mut payload: PlaylistPayload = extract(Capability::Playlist, &value)?;

    let videos = std::mem::take(&mut payload.videos)
        .into_iter()
        .map(|v| VideoSummary {
            video_id: v.video_id,
            title: v.title,
            author_id: v.author_id,
            author: v.author,
            length_text: length_text(v.length_seconds),
            view_count_text: v.view_count_text,
            published_text: None,
        })
        .collect();

    Ok((payload, videos))
}
