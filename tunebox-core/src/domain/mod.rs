//! Catalog entities and their client-facing projections.

pub mod album;
pub mod audio;
pub mod ids;
pub mod track;
pub mod validation;

pub use album::{Album, AlbumDraft, AlbumView};
pub use audio::{AudioFormat, AudioPayload};
pub use ids::{AlbumId, TrackId};
pub use track::{
    NewTrack, Track, TrackCreated, TrackMetadata, TrackView, format_size_mb,
};
pub use validation::{MAX_TEXT_LEN, ValidationError};
