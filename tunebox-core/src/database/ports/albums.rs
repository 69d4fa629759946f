use async_trait::async_trait;

use crate::domain::{Album, AlbumDraft, AlbumId, Track};
use crate::error::Result;

/// Repository port for album rows and their owned tracks.
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// Insert an album and return it with its assigned id.
    async fn insert_album(&self, draft: AlbumDraft) -> Result<Album>;

    /// Fetch an album by id.
    async fn get_album(&self, id: AlbumId) -> Result<Option<Album>>;

    /// All albums, oldest first.
    async fn list_albums(&self) -> Result<Vec<Album>>;

    /// Rewrite name and artist. Returns `false` if the album is unknown.
    async fn replace_album(&self, id: AlbumId, draft: AlbumDraft) -> Result<bool>;

    /// Atomically delete an album together with every track referencing it.
    ///
    /// Returns the removed track rows, or `None` when the album is unknown.
    async fn delete_album_cascade(&self, id: AlbumId) -> Result<Option<Vec<Track>>>;

    /// Atomically delete every album and album-owned track, then restart the
    /// album id sequence. Returns the number of albums removed along with
    /// the removed track rows.
    async fn delete_all_albums_cascade(&self) -> Result<(usize, Vec<Track>)>;
}
