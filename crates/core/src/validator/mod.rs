//! Semantic validation of mirror responses.
//!
//! A 2xx response is not enough: mirrors that are rate limited or stale
//! still answer with well-formed bodies. [`validate`] decides whether a
//! body is actually usable for its capability.

use serde_json::Value;
use std::fmt;

use crate::capability::Capability;

/// Field names under which channel payloads carry their latest videos.
pub const LATEST_VIDEO_FIELDS: &[&str] = &["latestvideo", "latestVideos"];

/// Why a well-formed body was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The body carries an explicit `error` field.
    UpstreamError,
    /// A channel payload with no latest videos.
    EmptyChannel,
    /// The first media stream of a video payload is not video.
    NonVideoStream,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::UpstreamError => "upstream-error",
            RejectReason::EmptyChannel => "empty-channel",
            RejectReason::NonVideoStream => "non-video-stream",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one attempt against one mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    HttpError(u16),
    MalformedBody,
    SemanticReject(RejectReason),
    NetworkFailure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::HttpError(_) => "http_error",
            Outcome::MalformedBody => "malformed_body",
            Outcome::SemanticReject(_) => "semantic_reject",
            Outcome::NetworkFailure(_) => "network_failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(_) => f.write_str("success"),
            Outcome::HttpError(status) => write!(f, "HTTP {}", status),
            Outcome::MalformedBody => f.write_str("malformed body"),
            Outcome::SemanticReject(reason) => write!(f, "rejected ({})", reason),
            Outcome::NetworkFailure(message) => write!(f, "network failure ({})", message),
        }
    }
}

/// Decide whether a body from a 2xx response is usable for `capability`.
///
/// Pure: the same inputs always give the same outcome. The optional media
/// check for video payloads is performed by the fetcher, not here.
pub fn validate(capability: Capability, body: &str) -> Outcome {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Outcome::MalformedBody;
    };

    if value.get("error").is_some() {
        return Outcome::SemanticReject(RejectReason::UpstreamError);
    }

    if expects_object(capability) && !value.is_object() {
        return Outcome::MalformedBody;
    }

    if capability == Capability::Channel && !has_latest_videos(&value) {
        return Outcome::SemanticReject(RejectReason::EmptyChannel);
    }

    Outcome::Success(body.to_string())
}

/// Look up the first of `aliases` present on `value`.
pub fn field_alias<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|name| value.get(*name))
}

/// URL of the first entry of a video payload's `formatStreams`.
pub fn first_stream_url(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("formatStreams")?
        .get(0)?
        .get("url")?
        .as_str()
        .map(str::to_string)
}

// Search results are a list; every other capability returns a single document.
fn expects_object(capability: Capability) -> bool {
    capability != Capability::Search
}

fn has_latest_videos(value: &Value) -> bool {
    field_alias(value, LATEST_VIDEO_FIELDS)
        .and_then(Value::as_array)
        .is_some_and(|videos| !videos.is_empty())
}
