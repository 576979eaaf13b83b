use std::sync::Arc;
use mirrortube_core::{MirrorRegistry, VideoCatalog};

/// Shared application state
pub struct AppState {
    catalog: VideoCatalog,
}

impl AppState {
    pub fn new(catalog: VideoCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &VideoCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &Arc<MirrorRegistry> {
        self.catalog.fetcher().registry()
    }

    pub fn strict_media_check(&self) -> bool {
        self.catalog.fetcher().strict_media_check()
    }
}
