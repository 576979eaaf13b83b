//! Video detail mapping.

use serde::Deserialize;

use crate::capability::Capability;
use crate::validator::field_alias;

use super::format::{extract, html_lines, last_thumbnail, length_text, parse_payload, Thumbnail};
use super::types::{VideoDetail, VideoPage, VideoSummary};
use super::CatalogError;

/// Field names under which mirrors return related videos, in priority order.
pub const RECOMMENDED_FIELDS: &[&str] = &["recommendedvideo", "recommendedVideos"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoPayload {
    title: String,
    #[serde(default)]
    description_html: String,
    #[serde(default)]
    length_seconds: u64,
    author_id: String,
    author: String,
    #[serde(default)]
    author_thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    view_count: u64,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    sub_count_text: String,
    #[serde(default)]
    format_streams: Vec<FormatStream>,
}

#[derive(Debug, Deserialize)]
struct FormatStream {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedVideo {
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

impl From<RelatedVideo> for VideoSummary {
    fn from(v: RelatedVideo) -> Self {
        Self {
            video_id: v.video_id,
            title: v.title,
            author_id: v.author_id,
            author: v.author,
            length_text: length_text(v.length_seconds),
            view_count_text: v.view_count_text,
            published_text: None,
        }
    }
}

pub(crate) fn map_video(body: &str) -> Result<VideoPage, CatalogError> {
    let value = parse_payload(Capability::Video, body)?;
    let payload: VideoPayload = extract(Capability::Video, &value)?;

    let recommended = match field_alias(&value, RECOMMENDED_FIELDS) {
        Some(items) => extract::<Vec<RelatedVideo>>(Capability::Video, items)?
            .into_iter()
            .map(VideoSummary::from)
            .collect(),
        None => vec![VideoSummary::load_failed()],
    };

    let video = VideoDetail {
        video_urls: payload
            .format_streams
            .iter()
            .rev()
            .take(2)
            .map(|s| s.url.clone())
            .collect(),
        description_html: html_lines(&payload.description_html),
        title: payload.title,
        length_text: length_text(payload.length_seconds),
        author_id: payload.author_id,
        author: payload.author,
        author_thumbnail_url: last_thumbnail(&payload.author_thumbnails),
        view_count: payload.view_count,
        like_count: payload.like_count,
        subscribers_count: payload.sub_count_text,
    };

    Ok(VideoPage { video, recommended })
}
