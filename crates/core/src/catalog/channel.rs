//! Channel page mapping.

use serde::Deserialize;

use crate::capability::Capability;
use crate::validator::{field_alias, LATEST_VIDEO_FIELDS};

use super::format::{
    extract, first_thumbnail, html_lines, last_thumbnail, length_text, parse_payload, Thumbnail,
};
use super::types::{ChannelPage, VideoSummary};
use super::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelPayload {
    author: String,
    #[serde(default)]
    author_id: String,
    #[serde(default)]
    author_thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    author_banners: Vec<Thumbnail>,
    #[serde(default)]
    description_html: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    sub_count: Option<u64>,
    #[serde(default)]
    sub_count_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelVideo {
    video_id: String,
    title: String,
    #[serde(default)]
    author_id: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    length_seconds: u64,
    #[serde(default)]
    view_count_text: String,
    #[serde(default)]
    published_text: Option<String>,
}

pub(crate) fn map_channel(body: &str) -> Result<ChannelPage, CatalogError> {
    let value = parse_payload(Capability::Channel, body)?;
    let payload: ChannelPayload = extract(Capability::Channel, &value)?;

    let latest: Vec<ChannelVideo> = match field_alias(&value, LATEST_VIDEO_FIELDS) {
        Some(items) => extract(Capability::Channel, items)?,
        None => Vec::new(),
    };

    let videos = latest
        .into_iter()
        .map(|v| VideoSummary {
            video_id: v.video_id,
            title: v.title,
            author_id: v.author_id.unwrap_or_else(|| payload.author_id.clone()),
            author: v.author.unwrap_or_else(|| payload.author.clone()),
            length_text: length_text(v.length_seconds),
            view_count_text: v.view_count_text,
            published_text: v.published_text,
        })
        .collect();

    let profile = payload
        .description_html
        .as_deref()
        .or(payload.description.as_deref())
        .unwrap_or_default();

    Ok(ChannelPage {
        channel_icon: last_thumbnail(&payload.author_thumbnails),
        author_banner: first_thumbnail(&payload.author_banners),
        channel_profile: html_lines(profile),
        subscribers_count: payload
            .sub_count_text
            .or_else(|| payload.sub_count.map(|n| n.to_string()))
            .unwrap_or_default(),
        channel_name: payload.author,
        videos,
    })
}
