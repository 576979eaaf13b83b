//! Mirror pool: the remote mirror list, per-capability rotation queues, and
//! the registry that owns them for the lifetime of the process.

mod queue;
mod registry;
mod source;

pub use queue::RotationQueue;
pub use registry::{MirrorList, MirrorRegistry};
pub use source::{load_mirror_list, parse_mirror_list, MirrorSourceError};

/// Base URL of one candidate server. The URL string is its identity.
pub type Mirror = String;
