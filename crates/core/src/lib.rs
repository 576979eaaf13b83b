pub mod capability;
pub mod catalog;
pub mod config;
pub mod failover;
pub mod identity;
pub mod metrics;
pub mod mirror;
pub mod testing;
pub mod transport;
pub mod validator;

pub use capability::{Capability, UnknownCapability};
pub use catalog::{CatalogError, VideoCatalog};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, FetchConfig,
    IdentityConfig, MirrorSourceConfig, ServerConfig,
};
pub use failover::{FailoverFetcher, FetchError};
pub use identity::{IdentityProvider, RandomUserAgent, StaticIdentity};
pub use mirror::{
    load_mirror_list, parse_mirror_list, Mirror, MirrorList, MirrorRegistry, MirrorSourceError,
    RotationQueue,
};
pub use transport::{HttpMirrorClient, MirrorClient, MirrorResponse, TransportError};
pub use validator::{validate, Outcome, RejectReason};
