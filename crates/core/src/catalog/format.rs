//! Shared payload helpers for the mappers.

use serde::Deserialize;
use serde_json::Value;

use crate::capability::Capability;

use super::CatalogError;

/// Thumbnail entry as served by mirrors.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

/// Parse a validated payload, reporting shape problems as invalid payloads.
pub(crate) fn parse_payload(capability: Capability, body: &str) -> Result<Value, CatalogError> {
    serde_json::from_str(body).map_err(|e| invalid(capability, e))
}

/// Deserialize a typed view of a payload value.
pub(crate) fn extract<'a, T: Deserialize<'a>>(
    capability: Capability,
    value: &'a Value,
) -> Result<T, CatalogError> {
    T::deserialize(value).map_err(|e| invalid(capability, e))
}

pub(crate) fn invalid(capability: Capability, error: impl std::fmt::Display) -> CatalogError {
    CatalogError::InvalidPayload {
        capability,
        message: error.to_string(),
    }
}

/// `H:MM:SS`, with a leading day count past 24 hours (`1 day, 0:00:05`).
pub fn length_text(seconds: u64) -> String {
    let days = seconds / 86_400;
    let rem = seconds % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

/// Mirrors often return protocol-relative thumbnail URLs.
pub(crate) fn absolute_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

pub(crate) fn html_lines(text: &str) -> String {
    text.replace('\n', "<br>")
}

pub(crate) fn last_thumbnail(thumbnails: &[Thumbnail]) -> Option<String> {
    thumbnails.last().map(|t| absolute_url(&t.url))
}

pub(crate) fn first_thumbnail(thumbnails: &[Thumbnail]) -> Option<String> {
    thumbnails.first().map(|t| absolute_url(&t.url))
}
