//! Page data handlers.
//!
//! Each handler resolves one catalog operation; mirror selection and
//! failover happen underneath in the fetcher.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use mirrortube_core::catalog::{ChannelPage, Comment, PlaylistPage, SearchPage, VideoPage};

use super::error::{catalog_error, PageError, PageErrorResponse};
use crate::state::AppState;

/// First page when none is requested.
const DEFAULT_PAGE: u32 = 1;

#[derive(Debug, Deserialize)]
pub struct WatchParams {
    pub v: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistParams {
    pub list: Option<String>,
    pub page: Option<u32>,
}

fn required(value: Option<String>, name: &str) -> Result<String, PageError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PageErrorResponse::bad_request(format!(
            "Missing query parameter '{}'",
            name
        ))),
    }
}

pub async fn watch(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WatchParams>,
) -> Result<Json<VideoPage>, PageError> {
    let video_id = required(params.v, "v")?;
    state
        .catalog()
        .video(&video_id)
        .await
        .map(Json)
        .map_err(catalog_error)
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchPage>, PageError> {
    let query = required(params.q, "q")?;
    let page = params.page.unwrap_or(DEFAULT_PAGE).max(1);
    state
        .catalog()
        .search(&query, page)
        .await
        .map(Json)
        .map_err(catalog_error)
}

pub async fn channel(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> Result<Json<ChannelPage>, PageError> {
    state
        .catalog()
        .channel(&channel_id)
        .await
        .map(Json)
        .map_err(catalog_error)
}

pub async fn playlist(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlaylistParams>,
) -> Result<Json<PlaylistPage>, PageError> {
    let playlist_id = required(params.list, "list")?;
    let page = params.page.unwrap_or(DEFAULT_PAGE).max(1);
    state
        .catalog()
        .playlist(&playlist_id, page)
        .await
        .map(Json)
        .map_err(catalog_error)
}

pub async fn comments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WatchParams>,
) -> Result<Json<Vec<Comment>>, PageError> {
    let video_id = required(params.v, "v")?;
    state
        .catalog()
        .comments(&video_id)
        .await
        .map(Json)
        .map_err(catalog_error)
}
