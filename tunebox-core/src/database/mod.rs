//! Metadata persistence: repository ports and their adapters.

pub mod ports;

#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod postgres;

pub use ports::{AlbumRepository, TrackRepository};

#[cfg(feature = "database")]
pub use postgres::{
    PoolSettings, PostgresAlbumRepository, PostgresDatabase,
    PostgresTrackRepository,
};
