//! Query capabilities served by the mirror pool.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the read-only query types a mirror serves.
///
/// Each capability has its own rotation queue and validation rule. The
/// serialized names match the keys of the remote mirror list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Video,
    Playlist,
    Search,
    Channel,
    Comments,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Video,
        Capability::Playlist,
        Capability::Search,
        Capability::Channel,
        Capability::Comments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Video => "video",
            Capability::Playlist => "playlist",
            Capability::Search => "search",
            Capability::Channel => "channel",
            Capability::Comments => "comments",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown capability: {0}")]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCapability(s.to_string()))
    }
}
