use std::{any::type_name_of_val, fmt, sync::Arc};

use rand::seq::index;
use tracing::{debug, info, warn};

use crate::{
    blob::{BlobKey, BlobStore},
    database::ports::TrackRepository,
    domain::{
        AlbumId, AudioFormat, AudioPayload, NewTrack, Track, TrackId,
        TrackMetadata, TrackView,
    },
    error::{CatalogError, Result},
};

/// Track lifecycle: metadata rows plus their audio payloads.
#[derive(Clone)]
pub struct TrackService {
    tracks: Arc<dyn TrackRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl fmt::Debug for TrackService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackService")
            .field("tracks", &type_name_of_val(self.tracks.as_ref()))
            .field("blobs", &type_name_of_val(self.blobs.as_ref()))
            .finish()
    }
}

/// A track together with its downloadable payload.
#[derive(Debug)]
pub struct TrackPayload {
    pub track: Track,
    pub format: AudioFormat,
    pub bytes: Vec<u8>,
}

impl TrackService {
    pub fn new(
        tracks: Arc<dyn TrackRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self { tracks, blobs }
    }

    /// Store the payload, then the row. The blob is removed again if the
    /// row cannot be written.
    pub async fn create_track(
        &self,
        metadata: TrackMetadata,
        payload: AudioPayload,
        album_id: Option<AlbumId>,
    ) -> Result<Track> {
        metadata.validate()?;

        let blob_key = self
            .blobs
            .put(&metadata.name, payload.format, &payload.bytes)
            .await?;

        let new_track = NewTrack {
            metadata,
            blob_key: blob_key.clone(),
            album_id,
        };

        match self.tracks.insert_track(new_track).await {
            Ok(track) => {
                info!(
                    track_id = %track.id,
                    album_id = ?track.album_id,
                    bytes = payload.bytes.len(),
                    "track created"
                );
                Ok(track)
            }
            Err(err) => {
                self.discard_blob(&blob_key).await;
                Err(err)
            }
        }
    }

    pub async fn get_track(&self, id: TrackId) -> Result<Track> {
        self.tracks
            .get_track(id)
            .await?
            .ok_or_else(|| CatalogError::track_not_found(id))
    }

    pub async fn list_tracks(&self) -> Result<Vec<TrackView>> {
        let tracks = self.tracks.list_tracks().await?;
        Ok(tracks.iter().map(Track::view).collect())
    }

    pub async fn list_album_tracks(&self, album_id: AlbumId) -> Result<Vec<Track>> {
        self.tracks.list_album_tracks(album_id).await
    }

    /// Load a track's audio bytes. A row whose blob went missing reads as
    /// `NotFound`.
    pub async fn read_payload(&self, id: TrackId) -> Result<TrackPayload> {
        let track = self.get_track(id).await?;
        let bytes = self.blobs.get(&track.blob_key).await?;
        Ok(TrackPayload {
            format: track.format(),
            track,
            bytes,
        })
    }

    /// Full replace of the descriptive fields and album assignment.
    ///
    /// A new payload is written under a key derived from the new name before
    /// the row is switched over; the previous blob is removed afterwards.
    pub async fn update_track(
        &self,
        id: TrackId,
        metadata: TrackMetadata,
        payload: Option<AudioPayload>,
        album_id: Option<AlbumId>,
    ) -> Result<()> {
        metadata.validate()?;
        let current = self.get_track(id).await?;

        let (blob_key, superseded) = match payload {
            Some(payload) => {
                let key = self
                    .blobs
                    .put(&metadata.name, payload.format, &payload.bytes)
                    .await?;
                (key, Some(current.blob_key))
            }
            None => (current.blob_key, None),
        };

        let replacement = NewTrack {
            metadata,
            blob_key: blob_key.clone(),
            album_id,
        };

        let outcome = self.tracks.replace_track(id, replacement).await;
        let replaced = match outcome {
            Ok(replaced) => replaced,
            Err(err) => {
                if superseded.is_some() {
                    self.discard_blob(&blob_key).await;
                }
                return Err(err);
            }
        };

        if !replaced {
            if superseded.is_some() {
                self.discard_blob(&blob_key).await;
            }
            return Err(CatalogError::track_not_found(id));
        }

        if let Some(old_key) = superseded {
            self.discard_blob(&old_key).await;
        }

        info!(track_id = %id, album_id = ?album_id, "track updated");
        Ok(())
    }

    /// Remove the row, then its payload.
    pub async fn delete_track(&self, id: TrackId) -> Result<()> {
        let track = self
            .tracks
            .delete_track(id)
            .await?
            .ok_or_else(|| CatalogError::track_not_found(id))?;

        self.release_blobs(std::slice::from_ref(&track)).await;
        info!(track_id = %id, "track deleted");
        Ok(())
    }

    /// Remove every track and restart the id sequence. Returns how many
    /// tracks were removed.
    pub async fn delete_all_tracks(&self) -> Result<usize> {
        let removed = self.tracks.delete_all_tracks().await?;
        self.release_blobs(&removed).await;
        info!(removed = removed.len(), "all tracks deleted");
        Ok(removed.len())
    }

    /// Pick `count` distinct tracks uniformly at random, in sampling order.
    pub async fn create_playlist(&self, count: usize) -> Result<Vec<TrackView>> {
        let tracks = self.tracks.list_tracks().await?;

        if count > tracks.len() {
            return Err(CatalogError::InvalidArgument(format!(
                "not enough tracks for a playlist of {count}: only {} stored",
                tracks.len()
            )));
        }

        let picked = {
            let mut rng = rand::rng();
            index::sample(&mut rng, tracks.len(), count)
        };

        debug!(requested = count, available = tracks.len(), "playlist sampled");
        Ok(picked.into_iter().map(|i| tracks[i].view()).collect())
    }

    /// Whether the metadata store answers.
    pub async fn store_reachable(&self) -> bool {
        match self.tracks.ping().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "metadata store unreachable");
                false
            }
        }
    }

    /// Remove the payloads of tracks whose rows are already gone.
    ///
    /// Missing blobs are skipped. Failures are logged; the rows cannot be
    /// brought back at this point.
    pub async fn release_blobs(&self, tracks: &[Track]) -> usize {
        let mut removed = 0;
        for track in tracks {
            match self.blobs.delete(&track.blob_key).await {
                Ok(true) => removed += 1,
                Ok(false) => {
                    debug!(
                        track_id = %track.id,
                        key = %track.blob_key,
                        "audio blob already missing"
                    );
                }
                Err(err) => {
                    warn!(
                        track_id = %track.id,
                        key = %track.blob_key,
                        error = %err,
                        "failed to remove audio blob"
                    );
                }
            }
        }
        removed
    }

    async fn discard_blob(&self, key: &BlobKey) {
        if let Err(err) = self.blobs.delete(key).await {
            warn!(key = %key, error = %err, "failed to discard audio blob");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        database::ports::AlbumRepository,
        domain::AlbumDraft,
        testing::{InMemoryCatalog, MemoryBlobStore},
    };

    struct Fixture {
        catalog: Arc<InMemoryCatalog>,
        blobs: Arc<MemoryBlobStore>,
        service: TrackService,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(InMemoryCatalog::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let service = TrackService::new(catalog.clone(), blobs.clone());
        Fixture {
            catalog,
            blobs,
            service,
        }
    }

    fn mp3(bytes: &[u8]) -> AudioPayload {
        AudioPayload::new(AudioFormat::Mp3, bytes.to_vec())
    }

    async fn seed(service: &TrackService, count: usize) -> Vec<Track> {
        let mut tracks = Vec::with_capacity(count);
        for i in 0..count {
            let track = service
                .create_track(
                    TrackMetadata::new(format!("Song {i}"), "Artist X", 3.0),
                    mp3(&[i as u8]),
                    None,
                )
                .await
                .unwrap();
            tracks.push(track);
        }
        tracks
    }

    #[tokio::test]
    async fn created_track_serves_its_payload() {
        let fx = fixture();
        let track = fx
            .service
            .create_track(
                TrackMetadata::new("Song A", "Artist X", 4.2),
                mp3(b"ID3 payload"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(track.id, TrackId(1));
        assert!(fx.blobs.contains(&track.blob_key).await);

        let payload = fx.service.read_payload(track.id).await.unwrap();
        assert_eq!(payload.bytes, b"ID3 payload");
        assert_eq!(payload.format, AudioFormat::Mp3);
        assert_eq!(payload.track.name, "Song A");
    }

    #[tokio::test]
    async fn invalid_metadata_stores_nothing() {
        let fx = fixture();
        let err = fx
            .service
            .create_track(
                TrackMetadata::new("x".repeat(31), "Artist X", 4.2),
                mp3(b"data"),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidInput(_)));
        assert!(fx.blobs.is_empty().await);
    }

    #[tokio::test]
    async fn failed_insert_discards_the_new_blob() {
        let fx = fixture();
        let err = fx
            .service
            .create_track(
                TrackMetadata::new("Song A", "Artist X", 4.2),
                mp3(b"data"),
                Some(AlbumId(9)),
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(fx.blobs.is_empty().await);
        assert!(fx.catalog.list_tracks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_blob_reads_as_not_found() {
        let fx = fixture();
        let track = seed(&fx.service, 1).await.remove(0);
        fx.blobs.evict(&track.blob_key).await;

        let err = fx.service.read_payload(track.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_without_payload_keeps_the_blob() {
        let fx = fixture();
        let album = fx
            .catalog
            .insert_album(AlbumDraft::new("Greatest Hits", "Artist X"))
            .await
            .unwrap();
        let track = seed(&fx.service, 1).await.remove(0);

        fx.service
            .update_track(
                track.id,
                TrackMetadata::new("Song B", "Artist Y", 5.0),
                None,
                Some(album.id),
            )
            .await
            .unwrap();

        let updated = fx.service.get_track(track.id).await.unwrap();
        assert_eq!(updated.name, "Song B");
        assert_eq!(updated.author, "Artist Y");
        assert_eq!(updated.album_id, Some(album.id));
        assert_eq!(updated.blob_key, track.blob_key);
        assert_eq!(fx.blobs.len().await, 1);
    }

    #[tokio::test]
    async fn update_with_payload_replaces_the_blob() {
        let fx = fixture();
        let track = seed(&fx.service, 1).await.remove(0);

        fx.service
            .update_track(
                track.id,
                TrackMetadata::new("Song B", "Artist X", 2.5),
                Some(AudioPayload::new(AudioFormat::Flac, b"fLaC".to_vec())),
                None,
            )
            .await
            .unwrap();

        assert!(!fx.blobs.contains(&track.blob_key).await);
        assert_eq!(fx.blobs.len().await, 1);

        let payload = fx.service.read_payload(track.id).await.unwrap();
        assert_eq!(payload.bytes, b"fLaC");
        assert_eq!(payload.format, AudioFormat::Flac);
    }

    #[tokio::test]
    async fn update_of_unknown_track_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .update_track(
                TrackId(3),
                TrackMetadata::new("Song B", "Artist X", 2.5),
                Some(mp3(b"data")),
                None,
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(fx.blobs.is_empty().await);
    }

    #[tokio::test]
    async fn delete_removes_row_and_blob() {
        let fx = fixture();
        let track = seed(&fx.service, 1).await.remove(0);

        fx.service.delete_track(track.id).await.unwrap();
        assert!(fx.blobs.is_empty().await);
        assert!(fx.service.get_track(track.id).await.unwrap_err().is_not_found());
        assert!(fx.service.delete_track(track.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_all_restarts_ids() {
        let fx = fixture();
        seed(&fx.service, 3).await;

        assert_eq!(fx.service.delete_all_tracks().await.unwrap(), 3);
        assert!(fx.blobs.is_empty().await);
        assert!(fx.service.list_tracks().await.unwrap().is_empty());

        let fresh = seed(&fx.service, 1).await.remove(0);
        assert_eq!(fresh.id, TrackId(1));
    }

    #[tokio::test]
    async fn playlist_draws_distinct_stored_tracks() {
        let fx = fixture();
        let stored: HashSet<TrackId> =
            seed(&fx.service, 5).await.iter().map(|t| t.id).collect();

        for count in 0..=5 {
            let playlist = fx.service.create_playlist(count).await.unwrap();
            assert_eq!(playlist.len(), count);

            let ids: HashSet<TrackId> = playlist.iter().map(|t| t.id).collect();
            assert_eq!(ids.len(), count);
            assert!(ids.is_subset(&stored));
        }
    }

    #[tokio::test]
    async fn playlist_larger_than_catalog_is_rejected() {
        let fx = fixture();
        seed(&fx.service, 2).await;

        let err = fx.service.create_playlist(3).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }
}
