use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{
    restart_id_sequence,
    tracks::{TRACK_COLUMNS, TrackRow, into_tracks},
};
use crate::database::ports::AlbumRepository;
use crate::domain::{Album, AlbumDraft, AlbumId, Track};
use crate::error::{CatalogError, Result};

#[derive(Debug, sqlx::FromRow)]
struct AlbumRow {
    id: i32,
    name: String,
    artist: String,
}

impl From<AlbumRow> for Album {
    fn from(row: AlbumRow) -> Self {
        Album {
            id: AlbumId(row.id),
            name: row.name,
            artist: row.artist,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PostgresAlbumRepository {
    pool: PgPool,
}

impl PostgresAlbumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AlbumRepository for PostgresAlbumRepository {
    async fn insert_album(&self, draft: AlbumDraft) -> Result<Album> {
        let row = sqlx::query_as::<_, AlbumRow>(
            r#"
            INSERT INTO albums (name, artist)
            VALUES ($1, $2)
            RETURNING id, name, artist
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.artist)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to create album: {}", e))
        })?;

        Ok(row.into())
    }

    async fn get_album(&self, id: AlbumId) -> Result<Option<Album>> {
        let row = sqlx::query_as::<_, AlbumRow>(
            "SELECT id, name, artist FROM albums WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Database query failed: {}", e))
        })?;

        Ok(row.map(Album::from))
    }

    async fn list_albums(&self) -> Result<Vec<Album>> {
        let rows = sqlx::query_as::<_, AlbumRow>(
            "SELECT id, name, artist FROM albums ORDER BY id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Database query failed: {}", e))
        })?;

        Ok(rows.into_iter().map(Album::from).collect())
    }

    async fn replace_album(&self, id: AlbumId, draft: AlbumDraft) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE albums SET name = $1, artist = $2 WHERE id = $3",
        )
        .bind(&draft.name)
        .bind(&draft.artist)
        .bind(id.get())
        .execute(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to update album: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_album_cascade(&self, id: AlbumId) -> Result<Option<Vec<Track>>> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to begin transaction: {}", e))
        })?;

        // Row lock keeps concurrent inserts from attaching new tracks mid-cascade.
        let locked: Option<i32> =
            sqlx::query_scalar("SELECT id FROM albums WHERE id = $1 FOR UPDATE")
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    CatalogError::Internal(format!("Database query failed: {}", e))
                })?;

        if locked.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, TrackRow>(&format!(
            "DELETE FROM musics WHERE album_id = $1 RETURNING {TRACK_COLUMNS}"
        ))
        .bind(id.get())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| CatalogError::Internal(format!("Delete failed: {}", e)))?;

        sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::Internal(format!("Delete failed: {}", e)))?;

        tx.commit().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to commit transaction: {}", e))
        })?;

        debug!(album_id = %id, tracks = rows.len(), "deleted album cascade");
        Ok(Some(into_tracks(rows)))
    }

    async fn delete_all_albums_cascade(&self) -> Result<(usize, Vec<Track>)> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to begin transaction: {}", e))
        })?;

        let locked: Vec<i32> =
            sqlx::query_scalar("SELECT id FROM albums ORDER BY id FOR UPDATE")
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| {
                    CatalogError::Internal(format!("Database query failed: {}", e))
                })?;

        let rows = sqlx::query_as::<_, TrackRow>(&format!(
            "DELETE FROM musics WHERE album_id IS NOT NULL RETURNING {TRACK_COLUMNS}"
        ))
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| CatalogError::Internal(format!("Delete failed: {}", e)))?;

        sqlx::query("DELETE FROM albums")
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::Internal(format!("Delete failed: {}", e)))?;

        restart_id_sequence(&mut tx, "albums").await?;

        tx.commit().await.map_err(|e| {
            CatalogError::Internal(format!("Failed to commit transaction: {}", e))
        })?;

        debug!(
            albums = locked.len(),
            tracks = rows.len(),
            "deleted all albums"
        );
        Ok((locked.len(), into_tracks(rows)))
    }
}
