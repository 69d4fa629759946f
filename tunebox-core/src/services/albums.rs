use std::{any::type_name_of_val, collections::HashMap, fmt, sync::Arc};

use tracing::info;

use super::tracks::TrackService;
use crate::{
    database::ports::AlbumRepository,
    domain::{Album, AlbumDraft, AlbumId, AlbumView, Track},
    error::{CatalogError, Result},
};

/// Album lifecycle. Deleting an album deletes the tracks it owns.
#[derive(Clone)]
pub struct AlbumService {
    albums: Arc<dyn AlbumRepository>,
    tracks: TrackService,
}

impl fmt::Debug for AlbumService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlbumService")
            .field("albums", &type_name_of_val(self.albums.as_ref()))
            .field("tracks", &self.tracks)
            .finish()
    }
}

impl AlbumService {
    pub fn new(albums: Arc<dyn AlbumRepository>, tracks: TrackService) -> Self {
        Self { albums, tracks }
    }

    pub async fn create_album(&self, draft: AlbumDraft) -> Result<Album> {
        draft.validate()?;
        let album = self.albums.insert_album(draft).await?;
        info!(album_id = %album.id, "album created");
        Ok(album)
    }

    pub async fn get_album(&self, id: AlbumId) -> Result<AlbumView> {
        let album = self
            .albums
            .get_album(id)
            .await?
            .ok_or_else(|| CatalogError::album_not_found(id))?;
        let tracks = self.tracks.list_album_tracks(id).await?;
        Ok(album.with_tracks(&tracks))
    }

    pub async fn list_albums(&self) -> Result<Vec<AlbumView>> {
        let albums = self.albums.list_albums().await?;
        if albums.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_album: HashMap<AlbumId, Vec<Track>> = HashMap::new();
        for album in &albums {
            let tracks = self.tracks.list_album_tracks(album.id).await?;
            by_album.insert(album.id, tracks);
        }

        Ok(albums
            .into_iter()
            .map(|album| {
                let tracks = by_album.remove(&album.id).unwrap_or_default();
                album.with_tracks(&tracks)
            })
            .collect())
    }

    /// Full replace of name and artist.
    pub async fn update_album(&self, id: AlbumId, draft: AlbumDraft) -> Result<()> {
        draft.validate()?;
        if !self.albums.replace_album(id, draft).await? {
            return Err(CatalogError::album_not_found(id));
        }
        info!(album_id = %id, "album updated");
        Ok(())
    }

    /// Delete the album and its tracks in one store transaction, then
    /// release the removed tracks' payloads.
    pub async fn delete_album(&self, id: AlbumId) -> Result<()> {
        let removed = self
            .albums
            .delete_album_cascade(id)
            .await?
            .ok_or_else(|| CatalogError::album_not_found(id))?;

        let blobs = self.tracks.release_blobs(&removed).await;
        info!(
            album_id = %id,
            tracks = removed.len(),
            blobs,
            "album deleted"
        );
        Ok(())
    }

    /// Delete every album with its tracks and restart the album id sequence.
    /// Returns how many albums were removed.
    pub async fn delete_all_albums(&self) -> Result<usize> {
        let (albums, removed) = self.albums.delete_all_albums_cascade().await?;
        let blobs = self.tracks.release_blobs(&removed).await;
        info!(albums, tracks = removed.len(), blobs, "all albums deleted");
        Ok(albums)
    }
}
