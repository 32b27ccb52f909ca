use std::{fmt, str::FromStr};

use {
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
};

use crate::error::{Error, Result};

/// Kind of uploaded content. Determines how it is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Document,
    Video,
    Photo,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Video => "video",
            Self::Photo => "photo",
        }
    }

    /// Delivered copies of perishable content are deleted after a delay.
    pub fn is_perishable(self) -> bool {
        matches!(self, Self::Video)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "document" => Ok(Self::Document),
            "video" => Ok(Self::Video),
            "photo" => Ok(Self::Photo),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}

/// One stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    /// Opaque, unguessable key used in share links.
    pub key: String,
    /// Platform file handle used to re-send the upload.
    pub file_id: String,
    pub kind: ContentKind,
    pub caption: String,
}

/// Persistent storage for uploaded content.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert a new record. Fails with [`Error::DuplicateKey`] if the key is taken.
    async fn create(&self, record: &ContentRecord) -> Result<()>;

    /// Replace the caption of `key`. Returns `false` when no such record exists.
    async fn update_caption(&self, key: &str, caption: &str) -> Result<bool>;

    async fn get(&self, key: &str) -> Result<Option<ContentRecord>>;
}
