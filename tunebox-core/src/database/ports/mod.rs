//! Repository ports for the catalog.
//!
//! Implementations live in adapters (Postgres, in-memory) and must keep the
//! same semantics: ids come from the store, bulk deletes restart the id
//! sequence, and cascades are all-or-nothing.

pub mod albums;
pub mod tracks;

pub use albums::AlbumRepository;
pub use tracks::TrackRepository;
