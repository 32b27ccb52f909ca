use std::sync::Arc;

use {
    base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD},
    tracing::{info, warn},
};

use {
    uploader_config::UploaderConfig,
    uploader_storage::{ContentRecord, ContentRepository, LinkRecord, LinkRepository},
};

use crate::{caption::normalize_caption, error::Result, event::Upload};

/// Random bytes behind each content key.
const CONTENT_KEY_BYTES: usize = 8;

/// Fresh unguessable content key: 8 random bytes, URL-safe base64 without
/// padding (11 characters).
pub fn mint_content_key() -> String {
    URL_SAFE_NO_PAD.encode(rand::random::<[u8; CONTENT_KEY_BYTES]>())
}

/// Deep link that opens the bot with `/start <key>`.
pub fn share_locator(bot_username: &str, key: &str) -> String {
    let name = bot_username.trim_start_matches('@');
    format!("https://t.me/{name}?start={key}")
}

/// Outcome of a successful intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedLink {
    pub key: String,
    pub locator: String,
    /// Caption as stored, after normalization.
    pub caption: String,
}

/// Stores uploads and issues share links for them.
pub struct ContentIntake {
    content: Arc<dyn ContentRepository>,
    links: Arc<dyn LinkRepository>,
}

impl ContentIntake {
    pub fn new(content: Arc<dyn ContentRepository>, links: Arc<dyn LinkRepository>) -> Self {
        Self { content, links }
    }

    /// Store `upload` under a new key and record its share link.
    ///
    /// A content-store failure (including a key collision) is returned. A
    /// link-store failure is only logged since the locator resolves by key.
    pub async fn ingest(&self, upload: Upload, config: &UploaderConfig) -> Result<IssuedLink> {
        let mut caption = normalize_caption(&upload.caption, &config.default_tag);
        if caption.is_empty() {
            caption.clone_from(&config.default_tag);
        }
        let record = ContentRecord {
            key: mint_content_key(),
            file_id: upload.file_id,
            kind: upload.kind,
            caption,
        };
        self.content.create(&record).await?;

        let locator = share_locator(&config.bot_username, &record.key);
        if let Err(e) = self
            .links
            .create(&LinkRecord::new(&record.key, &locator))
            .await
        {
            warn!(content_key = %record.key, error = %e, "failed to store share link");
        }
        info!(content_key = %record.key, kind = %record.kind, "content stored");

        Ok(IssuedLink {
            key: record.key,
            locator,
            caption: record.caption,
        })
    }
}
