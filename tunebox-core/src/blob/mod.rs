//! Audio payload storage.
//!
//! Payloads live outside the relational store and are addressed by a
//! [`BlobKey`] persisted on the track row.

pub mod file_store;
pub mod key;

pub use file_store::FsBlobStore;
pub use key::BlobKey;

use async_trait::async_trait;

use crate::{domain::AudioFormat, error::Result};

/// Key to bytes storage for audio payloads.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a key derived from `name` and return that key.
    async fn put(
        &self,
        name: &str,
        format: AudioFormat,
        bytes: &[u8],
    ) -> Result<BlobKey>;

    /// Read a payload. Fails with `NotFound` when the blob is missing.
    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>>;

    /// Remove a payload. Returns `false` when it was already gone.
    async fn delete(&self, key: &BlobKey) -> Result<bool>;
}
