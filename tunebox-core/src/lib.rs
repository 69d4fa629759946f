//! # Tunebox Core
//!
//! Catalog types, storage ports and business logic for the Tunebox audio
//! service.
//!
//! ## Overview
//!
//! - **Domain**: tracks, albums and their client-facing projections
//! - **Blob storage**: audio payloads kept outside the relational store
//! - **Database**: repository traits plus PostgreSQL adapters
//! - **Services**: create, replace, cascade delete and playlist sampling
//!
//! ## Feature Flags
//!
//! - `database`: Enables the PostgreSQL adapters and embedded migrations
//! - `test-utils`: Exposes in-memory repositories and blob store
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tunebox_core::{
//!     blob::FsBlobStore,
//!     database::{PoolSettings, PostgresDatabase},
//!     domain::{AudioFormat, AudioPayload, TrackMetadata},
//!     services::TrackService,
//! };
//!
//! async fn upload(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//!     let db = PostgresDatabase::connect(
//!         "postgres://localhost/tunebox",
//!         &PoolSettings::default(),
//!     )
//!     .await?;
//!     let tracks = TrackService::new(
//!         Arc::new(db.tracks().clone()),
//!         Arc::new(FsBlobStore::new("./music_files")),
//!     );
//!
//!     let track = tracks
//!         .create_track(
//!             TrackMetadata::new("Song A", "Artist X", 4.2),
//!             AudioPayload::new(AudioFormat::Mp3, bytes),
//!             None,
//!         )
//!         .await?;
//!     println!("stored track {}", track.id);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Audio payload storage
pub mod blob;

/// Repository ports and their PostgreSQL implementations
pub mod database;

/// Catalog entities and projections
pub mod domain;

/// Error types shared across the crate
pub mod error;

/// Track and album use cases
pub mod services;

/// In-memory adapters for tests
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod testing;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{CatalogError, Result};
