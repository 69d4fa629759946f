use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a track (`musics.id`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[cfg_attr(feature = "database", derive(sqlx::Type), sqlx(transparent))]
pub struct TrackId(pub i32);

impl TrackId {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TrackId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Store-assigned identifier of an album (`albums.id`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[cfg_attr(feature = "database", derive(sqlx::Type), sqlx(transparent))]
pub struct AlbumId(pub i32);

impl AlbumId {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for AlbumId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}
