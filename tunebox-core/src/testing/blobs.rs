use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    blob::{BlobKey, BlobStore},
    domain::AudioFormat,
    error::{CatalogError, Result},
};

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<BlobKey, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }

    pub async fn contains(&self, key: &BlobKey) -> bool {
        self.blobs.lock().await.contains_key(key)
    }

    /// Drop a blob behind the catalog's back.
    pub async fn evict(&self, key: &BlobKey) {
        self.blobs.lock().await.remove(key);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        name: &str,
        format: AudioFormat,
        bytes: &[u8],
    ) -> Result<BlobKey> {
        let key = BlobKey::derive(name, format);
        self.blobs.lock().await.insert(key.clone(), bytes.to_vec());
        Ok(key)
    }

    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>> {
        self.blobs.lock().await.get(key).cloned().ok_or_else(|| {
            CatalogError::NotFound(format!("audio file {key} is missing"))
        })
    }

    async fn delete(&self, key: &BlobKey) -> Result<bool> {
        Ok(self.blobs.lock().await.remove(key).is_some())
    }
}
