//! Video catalog: typed page data on top of the failover fetcher.
//!
//! Each operation builds the mirror path for one capability, lets the
//! [`FailoverFetcher`] pick a mirror, and reshapes the validated payload
//! into display-ready structures.

mod channel;
mod comments;
mod format;
mod playlist;
mod search;
mod types;
mod video;

pub use format::length_text;
pub use types::*;
pub use video::RECOMMENDED_FIELDS;

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::capability::Capability;
use crate::failover::{FailoverFetcher, FetchError};

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Unavailable(#[from] FetchError),

    #[error("Invalid {capability} payload: {message}")]
    InvalidPayload {
        capability: Capability,
        message: String,
    },
}

pub struct VideoCatalog {
    fetcher: Arc<FailoverFetcher>,
}

impl VideoCatalog {
    pub fn new(fetcher: Arc<FailoverFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Arc<FailoverFetcher> {
        &self.fetcher
    }

    pub async fn video(&self, video_id: &str) -> Result<VideoPage, CatalogError> {
        let path = format!("/videos/{}", urlencoding::encode(video_id));
        let body = self.fetcher.fetch(Capability::Video, &path).await?;
        video::map_video(&body)
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError> {
        let encoded = urlencoding::encode(query);
        let path = format!("/search?q={}&page={}&hl=jp", encoded, page);
        let body = self.fetcher.fetch(Capability::Search, &path).await?;
        let results = search::map_search(&body)?;
        debug!(query = %query, page, results = results.len(), "Search mapped");

        Ok(SearchPage {
            query: query.to_string(),
            page,
            results,
            next: format!("/search?q={}&page={}", encoded, page.saturating_add(1)),
        })
    }

    pub async fn channel(&self, channel_id: &str) -> Result<ChannelPage, CatalogError> {
        let path = format!("/channels/{}", urlencoding::encode(channel_id));
        let body = self.fetcher.fetch(Capability::Channel, &path).await?;
        channel::map_channel(&body)
    }

    pub async fn playlist(&self, playlist_id: &str, page: u32) -> Result<PlaylistPage, CatalogError> {
        let encoded = urlencoding::encode(playlist_id);
        let path = format!("/playlists/{}?page={}", encoded, page);
        let body = self.fetcher.fetch(Capability::Playlist, &path).await?;
        let (payload, videos) = playlist::map_playlist(&body)?;

        Ok(PlaylistPage {
            playlist_id: playlist_id.to_string(),
            title: payload.title,
            author: payload.author,
            page,
            videos,
            next: format!("/playlist?list={}&page={}", encoded, page.saturating_add(1)),
        })
    }

    pub async fn comments(&self, video_id: &str) -> Result<Vec<Comment>, CatalogError> {
        let path = format!("/comments/{}?hl=jp", urlencoding::encode(video_id));
        let body = self.fetcher.fetch(Capability::Comments, &path).await?;
        comments::map_comments(&body)
    }
}
