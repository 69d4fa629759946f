//! PostgreSQL adapters for the catalog ports.

pub mod albums;
pub mod tracks;

pub use albums::PostgresAlbumRepository;
pub use tracks::PostgresTrackRepository;

use std::{fmt, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::error::{CatalogError, Result};

/// Pool sizing for [`PostgresDatabase::connect`].
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Shared connection pool plus the repositories built on top of it.
///
/// Every repository holds its own clone of the pool handle; nothing here is
/// a process-wide session.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    tracks: PostgresTrackRepository,
    albums: PostgresAlbumRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(
        connection_string: &str,
        settings: &PoolSettings,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(connection_string)
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "Database connection failed: {}",
                    e
                ))
            })?;

        info!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            "database pool initialized"
        );

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            tracks: PostgresTrackRepository::new(pool.clone()),
            albums: PostgresAlbumRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn tracks(&self) -> &PostgresTrackRepository {
        &self.tracks
    }

    pub fn albums(&self) -> &PostgresAlbumRepository {
        &self.albums
    }

    /// Apply the embedded migrations.
    pub async fn initialize_schema(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            CatalogError::Internal(format!("Migration failed: {}", e))
        })?;
        Ok(())
    }
}

/// Restart a table's `SERIAL` id sequence so the next insert receives 1.
pub(crate) async fn restart_id_sequence(
    conn: &mut sqlx::PgConnection,
    table: &str,
) -> Result<()> {
    sqlx::query("SELECT setval(pg_get_serial_sequence($1, 'id'), 1, false)")
        .bind(table)
        .execute(conn)
        .await
        .map_err(|e| {
            CatalogError::Internal(format!(
                "Failed to restart {table} id sequence: {}",
                e
            ))
        })?;
    Ok(())
}
