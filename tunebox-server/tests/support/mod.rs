use std::{path::PathBuf, sync::Arc};

use anyhow::{Result, anyhow};
use axum_test::TestServer;
use tempfile::TempDir;
use tunebox_core::{
    blob::FsBlobStore,
    services::{AlbumService, TrackService},
    testing::InMemoryCatalog,
};
use tunebox_server::{
    AppState, create_app,
    infra::config::{
        Config, ConfigMetadata, CorsConfig, DatabaseConfig, ServerConfig,
        StorageConfig,
    },
};

pub struct TestApp {
    pub server: TestServer,
    pub storage_root: PathBuf,
    _tempdir: TempDir,
}

impl TestApp {
    /// Number of payload files currently in the storage root.
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(&self.storage_root)
            .map(|entries| entries.filter_map(|entry| entry.ok()).count())
            .unwrap_or(0)
    }
}

pub fn test_config(storage_root: PathBuf, max_upload_bytes: usize) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
        },
        storage: StorageConfig {
            root: storage_root,
            max_upload_bytes,
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
        },
        dev_mode: false,
        metadata: ConfigMetadata::default(),
    }
}

pub fn build_test_app() -> Result<TestApp> {
    build_test_app_with_limit(1024 * 1024)
}

/// Router over an in-memory catalog and a filesystem blob store rooted in a
/// fresh temporary directory.
pub fn build_test_app_with_limit(max_upload_bytes: usize) -> Result<TestApp> {
    let tempdir = tempfile::tempdir()?;
    let storage_root = tempdir.path().join("music_files");
    std::fs::create_dir_all(&storage_root)?;

    let catalog = Arc::new(InMemoryCatalog::new());
    let blobs = Arc::new(FsBlobStore::new(&storage_root));
    let tracks = TrackService::new(catalog.clone(), blobs);
    let albums = AlbumService::new(catalog, tracks.clone());

    let config = test_config(storage_root.clone(), max_upload_bytes);
    let state = AppState::new(tracks, albums, config);

    let server = TestServer::new(create_app(state))
        .map_err(|err| anyhow!(err.to_string()))?;

    Ok(TestApp {
        server,
        storage_root,
        _tempdir: tempdir,
    })
}
