use std::{fmt, path::Path};

use crate::error::{CatalogError, Result};

/// Audio container formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Ogg,
    Wav,
    M4a,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3,
        AudioFormat::Flac,
        AudioFormat::Ogg,
        AudioFormat::Wav,
        AudioFormat::M4a,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Flac => "flac",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Wav => "wav",
            AudioFormat::M4a => "m4a",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::M4a => "audio/mp4",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }

    /// Resolve the format of an uploaded file from its client-side name.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                let allowed: Vec<&str> =
                    Self::ALL.iter().map(|f| f.extension()).collect();
                CatalogError::InvalidInput(format!(
                    "unsupported audio file '{file_name}', expected one of: {}",
                    allowed.join(", ")
                ))
            })
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Raw audio payload together with its detected format.
#[derive(Clone)]
pub struct AudioPayload {
    pub format: AudioFormat,
    pub bytes: Vec<u8>,
}

impl AudioPayload {
    pub fn new(format: AudioFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }
}

impl fmt::Debug for AudioPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioPayload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(
            AudioFormat::from_file_name("Song.MP3").unwrap(),
            AudioFormat::Mp3
        );
        assert_eq!(
            AudioFormat::from_file_name("take.flac").unwrap(),
            AudioFormat::Flac
        );
    }

    #[test]
    fn non_audio_files_are_rejected() {
        let err = AudioFormat::from_file_name("cover.png").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));

        let err = AudioFormat::from_file_name("no_extension").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));
    }

    #[test]
    fn content_types_match_formats() {
        assert_eq!(AudioFormat::Mp3.content_type(), "audio/mpeg");
        assert_eq!(AudioFormat::M4a.content_type(), "audio/mp4");
    }
}
