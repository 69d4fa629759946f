use std::{fmt, sync::Arc};

use tunebox_core::services::{AlbumService, TrackService};

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub tracks: Arc<TrackService>,
    pub albums: Arc<AlbumService>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(tracks: TrackService, albums: AlbumService, config: Config) -> Self {
        Self {
            tracks: Arc::new(tracks),
            albums: Arc::new(albums),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
