//! Boundary between the bot core and the messaging platform.

use async_trait::async_trait;

use uploader_storage::ContentKind;

use crate::error::Result;

/// Platform chat identifier.
pub type ChatId = i64;

/// Platform message identifier, unique within a chat.
pub type MessageId = i32;

/// Platform user identifier.
pub type UserId = u64;

/// A single inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    /// Sends `data` back as a callback query when pressed.
    Callback { text: String, data: String },
    /// Opens `url`.
    Url { text: String, url: String },
}

impl Button {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Callback {
            text: text.into(),
            data: data.into(),
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Url {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// Inline keyboard attached below a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }
}

/// Outgoing text message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingText {
    pub text: String,
    /// Render `text` as Telegram HTML.
    pub html: bool,
    pub keyboard: Option<Keyboard>,
}

impl OutgoingText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: true,
            keyboard: None,
        }
    }

    /// Attach `keyboard` unless it has no buttons.
    #[must_use]
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = (!keyboard.is_empty()).then_some(keyboard);
        self
    }
}

/// A user's standing in a group, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Statuses that satisfy a membership requirement.
    pub fn is_passing(self) -> bool {
        matches!(self, Self::Creator | Self::Administrator | Self::Member)
    }
}

/// Outbound operations the bot core needs from the platform.
///
/// Implementations must be safe to call concurrently from the dispatcher and
/// from deferred deletion tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a text message and return its id.
    async fn send_text(&self, chat_id: ChatId, message: OutgoingText) -> Result<MessageId>;

    /// Re-send stored content by its platform file handle.
    async fn send_media(
        &self,
        chat_id: ChatId,
        kind: ContentKind,
        file_id: &str,
        caption: &str,
    ) -> Result<MessageId>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()>;

    /// Status of `user_id` in `group`, a bare public group username.
    async fn member_status(&self, group: &str, user_id: UserId) -> Result<MemberStatus>;

    /// Dismiss the loading indicator of a callback query.
    async fn answer_callback(&self, callback_id: &str) -> Result<()>;
}
