use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::AudioFormat;

const FALLBACK_SLUG: &str = "track";

/// Opaque handle of a stored audio payload.
///
/// Keys are derived from the declared track name plus a unique suffix, so two
/// tracks sharing a name never share a payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "database", derive(sqlx::Type), sqlx(transparent))]
pub struct BlobKey(String);

impl BlobKey {
    /// Derive a fresh key for a payload uploaded under `name`.
    pub fn derive(name: &str, format: AudioFormat) -> Self {
        Self(format!(
            "{}-{}.{}",
            slugify(name),
            Uuid::now_v7().simple(),
            format.extension()
        ))
    }

    /// Wrap a key read back from storage.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn format(&self) -> Option<AudioFormat> {
        self.0
            .rsplit_once('.')
            .and_then(|(_, ext)| AudioFormat::from_extension(ext))
    }

    /// Whether the key is safe to use as a single file name.
    pub fn is_valid(&self) -> bool {
        let key = self.0.as_str();
        !key.is_empty()
            && key.len() <= 255
            && !key.starts_with('.')
            && !key.contains("..")
            && !key.chars().any(|c| matches!(c, '/' | '\\' | '\0'))
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if slug.chars().all(|c| c == '_') {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
