use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use super::{BlobKey, BlobStore};
use crate::{
    domain::AudioFormat,
    error::{CatalogError, Result},
};

/// File-backed audio blobs, one file per key under a fixed root.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for_key(&self, key: &BlobKey) -> Result<PathBuf> {
        if !key.is_valid() {
            return Err(CatalogError::Internal(format!(
                "invalid audio blob key: {key}"
            )));
        }
        Ok(self.root.join(key.as_str()))
    }

    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|err| {
            CatalogError::Internal(format!(
                "failed to create audio blob dir {:?}: {err}",
                self.root
            ))
        })
    }

    /// Atomic write (tmp + rename); an existing file under the key is replaced.
    async fn write_atomic(&self, key: &BlobKey, bytes: &[u8]) -> Result<()> {
        self.ensure_root().await?;
        let path = self.path_for_key(key)?;

        let tmp = self
            .root
            .join(format!(".{key}.tmp-{}", Uuid::now_v7().simple()));

        let mut file = tokio::fs::File::create(&tmp).await.map_err(|err| {
            CatalogError::Internal(format!(
                "failed to create temp audio blob {:?}: {err}",
                tmp
            ))
        })?;
        file.write_all(bytes).await.map_err(|err| {
            CatalogError::Internal(format!(
                "failed to write temp audio blob {:?}: {err}",
                tmp
            ))
        })?;
        file.flush().await.map_err(|err| {
            CatalogError::Internal(format!(
                "failed to flush temp audio blob {:?}: {err}",
                tmp
            ))
        })?;
        drop(file);

        if let Err(err) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CatalogError::Internal(format!(
                "failed to move audio blob {:?} -> {:?}: {err}",
                tmp, path
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        name: &str,
        format: AudioFormat,
        bytes: &[u8],
    ) -> Result<BlobKey> {
        let key = BlobKey::derive(name, format);
        self.write_atomic(&key, bytes).await?;
        debug!(key = %key, bytes = bytes.len(), "stored audio blob");
        Ok(key)
    }

    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>> {
        let path = self.path_for_key(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(
                CatalogError::NotFound(format!("audio file {key} is missing")),
            ),
            Err(err) => Err(CatalogError::Io(err)),
        }
    }

    async fn delete(&self, key: &BlobKey) -> Result<bool> {
        let path = self.path_for_key(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %key, "removed audio blob");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(CatalogError::Io(err)),
        }
    }
}
