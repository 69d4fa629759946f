use serde::{Deserialize, Serialize};

use super::{
    audio::AudioFormat,
    ids::{AlbumId, TrackId},
    validation::{ValidationError, check_size, check_text},
};
use crate::blob::BlobKey;

/// Client-declared descriptive fields of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub name: String,
    pub author: String,
    /// Declared size in megabytes.
    pub size: f64,
}

impl TrackMetadata {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        size: f64,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            size,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("name", &self.name)?;
        check_text("author", &self.author)?;
        check_size(self.size)
    }
}

/// A persisted track row.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub author: String,
    pub size: f64,
    pub blob_key: BlobKey,
    pub album_id: Option<AlbumId>,
}

impl Track {
    pub fn metadata(&self) -> TrackMetadata {
        TrackMetadata::new(self.name.clone(), self.author.clone(), self.size)
    }

    /// Format of the stored payload, recovered from the blob key.
    pub fn format(&self) -> AudioFormat {
        self.blob_key.format().unwrap_or(AudioFormat::Mp3)
    }

    pub fn view(&self) -> TrackView {
        TrackView {
            id: self.id,
            name: self.name.clone(),
            author: self.author.clone(),
            size: format_size_mb(self.size),
        }
    }

    pub fn created(&self) -> TrackCreated {
        TrackCreated {
            id: self.id,
            name: self.name.clone(),
            author: self.author.clone(),
            size: self.size,
            album_id: self.album_id,
        }
    }
}

/// Row contents for an insert or a full replace.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrack {
    pub metadata: TrackMetadata,
    pub blob_key: BlobKey,
    pub album_id: Option<AlbumId>,
}

/// Read projection with a human readable size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackView {
    pub id: TrackId,
    pub name: String,
    pub author: String,
    pub size: String,
}

/// Response body for a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCreated {
    pub id: TrackId,
    pub name: String,
    pub author: String,
    pub size: f64,
    pub album_id: Option<AlbumId>,
}

/// Render a size as `"<value> MB"`.
///
/// Integral values keep a single decimal (`5.0 MB`), everything else uses the
/// shortest representation that round-trips (`4.2 MB`).
pub fn format_size_mb(size: f64) -> String {
    if size.is_finite() && size.fract() == 0.0 && size.abs() < 1e16 {
        format!("{size:.1} MB")
    } else {
        format!("{size} MB")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_projection_matches_legacy_rendering() {
        assert_eq!(format_size_mb(4.2), "4.2 MB");
        assert_eq!(format_size_mb(5.0), "5.0 MB");
        assert_eq!(format_size_mb(0.75), "0.75 MB");
        assert_eq!(format_size_mb(12.125), "12.125 MB");
    }

    #[test]
    fn metadata_validation_checks_every_field() {
        assert!(TrackMetadata::new("Song A", "Artist X", 4.2).validate().is_ok());
        assert_eq!(
            TrackMetadata::new("", "Artist X", 4.2).validate(),
            Err(ValidationError::TextLength { field: "name" })
        );
        assert_eq!(
            TrackMetadata::new("Song A", "x".repeat(31), 4.2).validate(),
            Err(ValidationError::TextLength { field: "author" })
        );
        assert_eq!(
            TrackMetadata::new("Song A", "Artist X", 0.0).validate(),
            Err(ValidationError::NonPositiveSize)
        );
    }

    #[test]
    fn projections_serialize_with_plain_ids() {
        let track = Track {
            id: TrackId(7),
            name: "Song A".into(),
            author: "Artist X".into(),
            size: 4.2,
            blob_key: BlobKey::from_stored("song_a.mp3"),
            album_id: None,
        };

        assert_eq!(
            serde_json::to_value(track.view()).unwrap(),
            serde_json::json!({
                "id": 7, "name": "Song A", "author": "Artist X", "size": "4.2 MB"
            })
        );
        assert_eq!(
            serde_json::to_value(track.created()).unwrap()["album_id"],
            serde_json::Value::Null
        );
    }
}
