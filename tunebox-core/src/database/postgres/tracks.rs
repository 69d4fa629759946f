use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::restart_id_sequence;
use crate::blob::BlobKey;
use crate::database::ports::TrackRepository;
use crate::domain::{AlbumId, NewTrack, Track, TrackId};
use crate::error::{CatalogError, Result};

pub(crate) const TRACK_COLUMNS: &str =
    "id, name, author, size, file_path, album_id";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TrackRow {
    id: i32,
    name: String,
    author: String,
    size: f64,
    file_path: String,
    album_id: Option<i32>,
}

impl From<TrackRow> for Track {
    fn from(row: TrackRow) -> Self {
        Track {
            id: TrackId(row.id),
            name: row.name,
            author: row.author,
            size: row.size,
            blob_key: BlobKey::from_stored(row.file_path),
            album_id: row.album_id.map(AlbumId),
        }
    }
}

pub(crate) fn into_tracks(rows: Vec<TrackRow>) -> Vec<Track> {
    let mut tracks: Vec<Track> = rows.into_iter().map(Track::from).collect();
    tracks.sort_by_key(|track| track.id);
    tracks
}

fn map_write_error(
    err: sqlx::Error,
    album_id: Option<AlbumId>,
    action: &str,
) -> CatalogError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_foreign_key_violation()
        && let Some(album_id) = album_id
    {
        return CatalogError::album_not_found(album_id);
    }
    CatalogError::Internal(format!("Failed to {action} track: {}", err))
}

#[derive(Clone, Debug)]
pub struct PostgresTrackRepository {
    pool: PgPool,
}

impl PostgresTrackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TrackRepository for PostgresTrackRepository {
    async fn insert_track(&self, track: NewTrack) -> Result<Track> {
        let album_id = track.album_id;
        let row = sqlx::query_as::<_, TrackRow>(&format!(
            r#"
            INSERT INTO musics (name, author, size, file_path, album_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TRACK_COLUMNS}
            "#
        ))
        .bind(&track.metadata.name)
        .bind(&track.metadata.author)
        .bind(track.metadata.size)
        .bind(track.blob_key.as_str())
        .bind(album_id.map(AlbumId::get))
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, album_id, "create"))?;

        Ok(row.into())
    }

    async fn get_track(&self, id: TrackId) -> Result<Option<Track>> {
        let row = sqlx::query_as::<_, TrackRow>(&format!(
            "SELECT {TRACK_COLUMNS} FROM musics WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Database query failed: {}", e))
        })?;

        Ok(row.map(Track::from))
    }

    async fn list_tracks(&self) -> Result<Vec<Track>> {
        let rows = sqlx::query_as::<_, TrackRow>(&format!(
            "SELECT {TRACK_COLUMNS} FROM musics ORDER BY id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Database query failed: {}", e))
        })?;

        Ok(rows.into_iter().map(Track::from).collect())
    }

    async fn list_album_tracks(&self, album_id: AlbumId) -> Result<Vec<Track>> {
        let rows = sqlx::query_as::<_, TrackRow>(&format!(
            "SELECT {TRACK_COLUMNS} FROM musics WHERE album_id = $1 ORDER BY id"
        ))
        .bind(album_id.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Database query failed: {}", e))
        })?;

        Ok(rows.into_iter().map(Track::from).collect())
    }

    async fn replace_track(&self, id: TrackId, track: NewTrack) -> Result<bool> {
        let album_id = track.album_id;
        let result = sqlx::query(
            r#"
            UPDATE musics
            SET
                name = $1,
                author = $2,
                size = $3,
                file_path = $4,
                album_id = $5
            WHERE id = $6
            "#,
        )
        .bind(&track.metadata.name)
        .bind(&track.metadata.author)
        .bind(track.metadata.size)
        .bind(track.blob_key.as_str())
        .bind(album_id.map(AlbumId::get))
        .bind(id.get())
        .execute(self.pool())
        .await
        .map_err(|e| map_write_error(e, album_id, "update"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_track(&self, id: TrackId) -> Result<Option<Track>> {
        let row = sqlx::query_as::<_, TrackRow>(&format!(
            "DELETE FROM musics WHERE id = $1 RETURNING {TRACK_COLUMNS}"
        ))
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CatalogError::Internal(format!("Delete failed: {}", e)))?;

        Ok(row.map(Track::from))
    }

    async fn delete_all_tracks(&self) -> Result<Vec<Track>> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to begin transaction: {}", e))
        })?;

        let rows = sqlx::query_as::<_, TrackRow>(&format!(
            "DELETE FROM musics RETURNING {TRACK_COLUMNS}"
        ))
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| CatalogError::Internal(format!("Delete failed: {}", e)))?;

        restart_id_sequence(&mut tx, "musics").await?;

        tx.commit().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to commit transaction: {}", e))
        })?;

        debug!(removed = rows.len(), "deleted all track rows");
        Ok(into_tracks(rows))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Database ping failed: {}", e))
            })?;
        Ok(())
    }
}
