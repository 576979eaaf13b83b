//! Comment list mapping.

use serde::Deserialize;

use crate::capability::Capability;

use super::format::{extract, first_thumbnail, html_lines, parse_payload, Thumbnail};
use super::types::Comment;
use super::CatalogError;

#[derive(Debug, Deserialize)]
struct CommentsPayload {
    #[serde(default)]
    comments: Vec<UpstreamComment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamComment {
    author: String,
    #[serde(default)]
    author_id: String,
    #[serde(default)]
    author_thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    content_html: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    like_count: Option<u64>,
    #[serde(default)]
    published_text: Option<String>,
}

pub(crate) fn map_comments(body: &str) -> Result<Vec<Comment>, CatalogError> {
    let value = parse_payload(Capability::Comments, body)?;
    let payload: CommentsPayload = extract(Capability::Comments, &value)?;

    Ok(payload
        .comments
        .into_iter()
        .map(|c| Comment {
            author_icon: first_thumbnail(&c.author_thumbnails),
            content_html: html_lines(
                c.content_html
                    .as_deref()
                    .or(c.content.as_deref())
                    .unwrap_or_default(),
            ),
            author: c.author,
            author_id: c.author_id,
            like_count: c.like_count.unwrap_or(0),
            published_text: c.published_text.unwrap_or_default(),
        })
        .collect())
}
