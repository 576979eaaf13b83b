//! Search results mapping.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::capability::Capability;

use super::format::{absolute_url, extract, last_thumbnail, length_text, parse_payload, Thumbnail};
use super::types::{ChannelSummary, PlaylistSummary, SearchItem, VideoSummary};
use super::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchVideo {
    video_id: String,
    title: String,
    #[serde(default)]
    author_id: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    length_seconds: u64,
    #[serde(default)]
    view_count_text: Option<String>,
    #[serde(default)]
    view_count: Option<u64>,
    #[serde(default)]
    published_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchChannel {
    author_id: String,
    author: String,
    #[serde(default)]
    author_thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    sub_count: Option<u64>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPlaylist {
    playlist_id: String,
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    playlist_thumbnail: Option<String>,
    #[serde(default)]
    video_count: u64,
}

pub(crate) fn map_search(body: &str) -> Result<Vec<SearchItem>, CatalogError> {
    let value = parse_payload(Capability::Search, body)?;
    let items: Vec<Value> = extract(Capability::Search, &value)?;

    Ok(items.iter().filter_map(map_item).collect())
}

fn map_item(item: &Value) -> Option<SearchItem> {
    let kind = item.get("type").and_then(Value::as_str)?;
    let mapped = match kind {
        "video" => SearchVideo::deserialize(item).map(|v| {
            SearchItem::Video(VideoSummary {
                view_count_text: v
                    .view_count_text
                    .or_else(|| v.view_count.map(|c| c.to_string()))
                    .unwrap_or_default(),
                video_id: v.video_id,
                title: v.title,
                author_id: v.author_id,
                author: v.author,
                length_text: length_text(v.length_seconds),
                published_text: v.published_text,
            })
        }),
        "channel" => SearchChannel::deserialize(item).map(|c| {
            SearchItem::Channel(ChannelSummary {
                thumbnail_url: last_thumbnail(&c.author_thumbnails),
                author_id: c.author_id,
                author: c.author,
                subscribers_count: c.sub_count.map(|n| n.to_string()).unwrap_or_default(),
                description: c.description,
            })
        }),
        "playlist" => SearchPlaylist::deserialize(item).map(|p| {
            SearchItem::Playlist(PlaylistSummary {
                playlist_id: p.playlist_id,
                title: p.title,
                author: p.author,
                thumbnail_url: p.playlist_thumbnail.as_deref().map(absolute_url),
                video_count: p.video_count,
            })
        }),
        other => {
            debug!(kind = other, "Skipping unsupported search item");
            return None;
        }
    };

    match mapped {
        Ok(item) => Some(item),
        Err(e) => {
            debug!(kind = kind, error = %e, "Skipping malformed search item");
            None
        }
    }
}
