use serde::{Deserialize, Serialize};

use super::{
    ids::AlbumId,
    track::{Track, TrackView},
    validation::{ValidationError, check_text},
};

/// Client-supplied album fields; used for both create and full replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumDraft {
    pub name: String,
    pub artist: String,
}

impl AlbumDraft {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("name", &self.name)?;
        check_text("artist", &self.artist)
    }
}

/// A persisted album row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub artist: String,
}

impl Album {
    pub fn with_tracks(self, tracks: &[Track]) -> AlbumView {
        AlbumView {
            id: self.id,
            name: self.name,
            artist: self.artist,
            tracks: tracks.iter().map(Track::view).collect(),
        }
    }
}

/// Album with its resolved tracks, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumView {
    pub id: AlbumId,
    pub name: String,
    pub artist: String,
    pub tracks: Vec<TrackView>,
}
