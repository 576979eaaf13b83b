use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use mirrortube_core::{Capability, Mirror};

use crate::metrics::encode_metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
pub struct InfoResponse {
    pub version: &'static str,
    pub strict_media_check: bool,
    /// Current queue order per capability, head first.
    pub mirrors: BTreeMap<Capability, Vec<Mirror>>,
}

pub async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION"),
        strict_media_check: state.strict_media_check(),
        mirrors: state.registry().snapshot().await,
    })
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
