use async_trait::async_trait;

use crate::domain::{AlbumId, NewTrack, Track, TrackId};
use crate::error::Result;

/// Repository port for track rows.
#[async_trait]
pub trait TrackRepository: Send + Sync {
    /// Insert a row and return it with its assigned id.
    ///
    /// Fails with `NotFound` when `album_id` names no album.
    async fn insert_track(&self, track: NewTrack) -> Result<Track>;

    /// Fetch a track by id.
    async fn get_track(&self, id: TrackId) -> Result<Option<Track>>;

    /// All tracks, oldest first.
    async fn list_tracks(&self) -> Result<Vec<Track>>;

    /// Tracks assigned to an album, oldest first.
    async fn list_album_tracks(&self, album_id: AlbumId) -> Result<Vec<Track>>;

    /// Rewrite every column of a row. Returns `false` if the row is gone.
    async fn replace_track(&self, id: TrackId, track: NewTrack) -> Result<bool>;

    /// Delete a row and return what was removed.
    async fn delete_track(&self, id: TrackId) -> Result<Option<Track>>;

    /// Delete every row and restart the id sequence at its initial value.
    async fn delete_all_tracks(&self) -> Result<Vec<Track>>;

    /// Cheap connectivity check against the backing store.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
