use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
};

use crate::error::Result;

/// A share link issued for a content key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub key: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl LinkRecord {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            created_at: Utc::now(),
        }
    }
}

/// Persistent storage for issued links.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    async fn create(&self, link: &LinkRecord) -> Result<()>;
}
