//! Mapping of catalog failures to HTTP responses.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use tracing::error;
use mirrortube_core::CatalogError;

/// Error body returned by page routes.
#[derive(Debug, Serialize)]
pub struct PageErrorResponse {
    pub error: String,
    /// Machine-readable category: `mirrors_unavailable`, `internal` or `bad_request`.
    pub kind: &'static str,
}

pub type PageError = (StatusCode, Json<PageErrorResponse>);

impl PageErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> PageError {
        (
            StatusCode::BAD_REQUEST,
            Json(PageErrorResponse {
                error: message.into(),
                kind: "bad_request",
            }),
        )
    }
}

/// No mirror answered in time: 503, distinct from internal failures.
pub fn catalog_error(e: CatalogError) -> PageError {
    match e {
        CatalogError::Unavailable(fetch) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(PageErrorResponse {
                error: fetch.to_string(),
                kind: "mirrors_unavailable",
            }),
        ),
        invalid @ CatalogError::InvalidPayload { .. } => {
            error!(error = %invalid, "Validated payload could not be mapped");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PageErrorResponse {
                    error: invalid.to_string(),
                    kind: "internal",
                }),
            )
        }
    }
}
