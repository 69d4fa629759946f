use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    database::ports::{AlbumRepository, TrackRepository},
    domain::{Album, AlbumDraft, AlbumId, NewTrack, Track, TrackId},
    error::{CatalogError, Result},
};

const FIRST_ID: i32 = 1;

#[derive(Debug)]
struct CatalogState {
    tracks: BTreeMap<TrackId, Track>,
    albums: BTreeMap<AlbumId, Album>,
    next_track_id: i32,
    next_album_id: i32,
}

impl CatalogState {
    fn check_album(&self, album_id: Option<AlbumId>) -> Result<()> {
        match album_id {
            Some(id) if !self.albums.contains_key(&id) => {
                Err(CatalogError::album_not_found(id))
            }
            _ => Ok(()),
        }
    }

    fn take_album_tracks(&mut self, album_id: AlbumId) -> Vec<Track> {
        let ids: Vec<TrackId> = self
            .tracks
            .values()
            .filter(|track| track.album_id == Some(album_id))
            .map(|track| track.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.tracks.remove(&id))
            .collect()
    }
}

/// Both catalog ports over a single in-memory state, mirroring the
/// Postgres schema: serial ids, album foreign key, sequence restarts.
#[derive(Debug)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CatalogState {
                tracks: BTreeMap::new(),
                albums: BTreeMap::new(),
                next_track_id: FIRST_ID,
                next_album_id: FIRST_ID,
            }),
        }
    }
}

#[async_trait]
impl TrackRepository for InMemoryCatalog {
    async fn insert_track(&self, track: NewTrack) -> Result<Track> {
        let mut state = self.state.lock().await;
        state.check_album(track.album_id)?;

        let id = TrackId(state.next_track_id);
        state.next_track_id += 1;

        let record = Track {
            id,
            name: track.metadata.name,
            author: track.metadata.author,
            size: track.metadata.size,
            blob_key: track.blob_key,
            album_id: track.album_id,
        };
        state.tracks.insert(id, record.clone());
        Ok(record)
    }

    async fn get_track(&self, id: TrackId) -> Result<Option<Track>> {
        Ok(self.state.lock().await.tracks.get(&id).cloned())
    }

    async fn list_tracks(&self) -> Result<Vec<Track>> {
        Ok(self.state.lock().await.tracks.values().cloned().collect())
    }

    async fn list_album_tracks(&self, album_id: AlbumId) -> Result<Vec<Track>> {
        Ok(self
            .state
            .lock()
            .await
            .tracks
            .values()
            .filter(|track| track.album_id == Some(album_id))
            .cloned()
            .collect())
    }

    async fn replace_track(&self, id: TrackId, track: NewTrack) -> Result<bool> {
        let mut state = self.state.lock().await;
        state.check_album(track.album_id)?;

        let Some(existing) = state.tracks.get_mut(&id) else {
            return Ok(false);
        };
        existing.name = track.metadata.name;
        existing.author = track.metadata.author;
        existing.size = track.metadata.size;
        existing.blob_key = track.blob_key;
        existing.album_id = track.album_id;
        Ok(true)
    }

    async fn delete_track(&self, id: TrackId) -> Result<Option<Track>> {
        Ok(self.state.lock().await.tracks.remove(&id))
    }

    async fn delete_all_tracks(&self) -> Result<Vec<Track>> {
        let mut state = self.state.lock().await;
        let removed = std::mem::take(&mut state.tracks);
        state.next_track_id = FIRST_ID;
        Ok(removed.into_values().collect())
    }
}

#[async_trait]
impl AlbumRepository for InMemoryCatalog {
    async fn insert_album(&self, draft: AlbumDraft) -> Result<Album> {
        let mut state = self.state.lock().await;
        let id = AlbumId(state.next_album_id);
        state.next_album_id += 1;

        let album = Album {
            id,
            name: draft.name,
            artist: draft.artist,
        };
        state.albums.insert(id, album.clone());
        Ok(album)
    }

    async fn get_album(&self, id: AlbumId) -> Result<Option<Album>> {
        Ok(self.state.lock().await.albums.get(&id).cloned())
    }

    async fn list_albums(&self) -> Result<Vec<Album>> {
        Ok(self.state.lock().await.albums.values().cloned().collect())
    }

    async fn replace_album(&self, id: AlbumId, draft: AlbumDraft) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some(album) = state.albums.get_mut(&id) else {
            return Ok(false);
        };
        album.name = draft.name;
        album.artist = draft.artist;
        Ok(true)
    }

    async fn delete_album_cascade(&self, id: AlbumId) -> Result<Option<Vec<Track>>> {
        let mut state = self.state.lock().await;
        if !state.albums.contains_key(&id) {
            return Ok(None);
        }
        let removed = state.take_album_tracks(id);
        state.albums.remove(&id);
        Ok(Some(removed))
    }

    async fn delete_all_albums_cascade(&self) -> Result<(usize, Vec<Track>)> {
        let mut state = self.state.lock().await;
        let album_ids: Vec<AlbumId> = state.albums.keys().copied().collect();

        let mut removed = Vec::new();
        for album_id in &album_ids {
            removed.extend(state.take_album_tracks(*album_id));
        }
        removed.sort_by_key(|track| track.id);

        state.albums.clear();
        state.next_album_id = FIRST_ID;
        Ok((album_ids.len(), removed))
    }
}
