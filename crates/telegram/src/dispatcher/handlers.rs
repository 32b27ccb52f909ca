use {
    secrecy::ExposeSecret,
    tracing::{debug, info, warn},
};

use uploader_storage::ContentRecord;

use super::Dispatcher;
use crate::{
    caption::normalize_caption,
    command::Command,
    error::Result,
    event::Upload,
    texts,
    transport::{ChatId, OutgoingText, UserId},
};

impl Dispatcher {
    pub(super) async fn on_command(
        &self,
        command: Command,
        sender: UserId,
        chat_id: ChatId,
        args: &str,
    ) -> Result<()> {
        match command {
            Command::Start => self.on_start(sender, chat_id, args).await,
            Command::Help => {
                self.on_help(chat_id).await;
                Ok(())
            },
            Command::Login => {
                self.on_login(sender, chat_id, args).await;
                Ok(())
            },
            Command::Logout => {
                self.on_logout(sender, chat_id).await;
                Ok(())
            },
            Command::SetCaption => self.on_set_caption(chat_id, args).await,
            Command::SetTag => {
                self.on_set_tag(chat_id, args).await;
                Ok(())
            },
        }
    }

    /// Send a reply, logging rather than returning a failure.
    async fn reply(&self, chat_id: ChatId, message: OutgoingText) {
        if let Err(e) = self.transport.send_text(chat_id, message).await {
            warn!(chat_id, error = %e, "failed to send reply");
        }
    }

    async fn reply_plain(&self, chat_id: ChatId, text: impl Into<String>) {
        self.reply(chat_id, OutgoingText::plain(text)).await;
    }

    async fn on_start(&self, sender: UserId, chat_id: ChatId, args: &str) -> Result<()> {
        let Some(key) = args.split_whitespace().next() else {
            let config = self.config.read();
            let welcome = OutgoingText::plain(texts::welcome(&config))
                .with_keyboard(texts::guide_keyboard());
            self.reply(chat_id, welcome).await;
            return Ok(());
        };

        if !self.gate.is_member(sender).await {
            let config = self.config.read();
            let join = OutgoingText::plain(texts::join(&config))
                .with_keyboard(texts::join_keyboard(&config.sponsored_channels));
            self.reply(chat_id, join).await;
            return Ok(());
        }

        match self.content.get(key).await {
            Ok(Some(record)) => self.deliver(chat_id, &record).await,
            Ok(None) => {
                debug!(user_id = sender, content_key = key, "content key not found");
                let not_found = texts::not_found(&self.config.read()).to_string();
                self.reply_plain(chat_id, not_found).await;
                Ok(())
            },
            Err(e) => {
                warn!(user_id = sender, content_key = key, error = %e, "content lookup failed");
                self.reply_plain(chat_id, texts::LOOKUP_FAILED).await;
                Ok(())
            },
        }
    }

    /// Send stored content. Perishable content is followed by a warning and
    /// both messages are scheduled for deletion.
    async fn deliver(&self, chat_id: ChatId, record: &ContentRecord) -> Result<()> {
        let content_id = self
            .transport
            .send_media(chat_id, record.kind, &record.file_id, &record.caption)
            .await?;
        info!(chat_id, content_key = %record.key, kind = %record.kind, "content delivered");
        if !record.kind.is_perishable() {
            return Ok(());
        }

        let config = self.config.read();
        let delay = config.delete_delay();
        let warning = OutgoingText::plain(texts::warning(&config));
        match self.transport.send_text(chat_id, warning).await {
            Ok(warning_id) => {
                self.scheduler
                    .schedule(chat_id, vec![content_id, warning_id], delay);
                Ok(())
            },
            Err(e) => {
                // The content itself must still go away.
                self.scheduler.schedule(chat_id, vec![content_id], delay);
                Err(e)
            },
        }
    }

    async fn on_help(&self, chat_id: ChatId) {
        let bot_username = self.config.read().bot_username;
        let help = OutgoingText::html(texts::help(&bot_username))
            .with_keyboard(texts::guide_keyboard());
        self.reply(chat_id, help).await;
    }

    async fn on_login(&self, sender: UserId, chat_id: ChatId, args: &str) {
        let fields: Vec<&str> = args.split_whitespace().collect();
        let [password] = fields.as_slice() else {
            self.reply_plain(chat_id, texts::LOGIN_USAGE).await;
            return;
        };
        let matches = *password == self.config.read().admin_password.expose_secret().as_str();
        if !matches {
            warn!(user_id = sender, "admin login rejected");
            self.reply_plain(chat_id, texts::LOGIN_INVALID).await;
            return;
        }
        self.sessions.set_authenticated(sender, true);
        info!(user_id = sender, "admin logged in");
        self.reply_plain(chat_id, texts::LOGIN_OK).await;
    }

    async fn on_logout(&self, sender: UserId, chat_id: ChatId) {
        if !self.sessions.is_authenticated(sender) {
            self.reply_plain(chat_id, texts::NOT_LOGGED_IN).await;
            return;
        }
        self.sessions.set_authenticated(sender, false);
        info!(user_id = sender, "admin logged out");
        self.reply_plain(chat_id, texts::LOGOUT_OK).await;
    }

    /// `/setcaption <key> <caption...>`; the caption keeps its inner spacing.
    async fn on_set_caption(&self, chat_id: ChatId, args: &str) -> Result<()> {
        if args.is_empty() {
            self.reply_plain(chat_id, texts::SETCAPTION_USAGE).await;
            return Ok(());
        }
        let (key, raw_caption) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
        let raw_caption = raw_caption.trim_start();
        if raw_caption.trim().is_empty() {
            self.reply_plain(chat_id, texts::CAPTION_EMPTY).await;
            return Ok(());
        }

        let config = self.config.read();
        let caption = normalize_caption(raw_caption, &config.default_tag);
        match self.content.update_caption(key, &caption).await {
            Ok(true) => {
                info!(content_key = key, "caption updated");
                self.reply_plain(chat_id, texts::caption_updated(key)).await;
            },
            Ok(false) => {
                self.reply_plain(chat_id, texts::not_found(&config)).await;
            },
            Err(e) => {
                warn!(content_key = key, error = %e, "caption update failed");
                self.reply_plain(chat_id, texts::CAPTION_FAILED).await;
            },
        }
        Ok(())
    }

    /// `/settag @tag`. The new tag is live even if persisting it fails; the
    /// admin is told about the failure separately.
    async fn on_set_tag(&self, chat_id: ChatId, args: &str) {
        let fields: Vec<&str> = args.split_whitespace().collect();
        let outcome = self.config.update(|config| match fields.as_slice() {
            [tag] if tag.starts_with('@') => {
                config.default_tag = (*tag).to_string();
                (texts::tag_updated(tag), true)
            },
            _ => (texts::SETTAG_USAGE.to_string(), false),
        });
        self.reply_plain(chat_id, outcome.response).await;
        if let Some(e) = outcome.persist_error {
            warn!(error = %e, "default tag changed in memory only");
            self.reply_plain(chat_id, texts::PERSIST_FAILED).await;
        }
    }

    pub(super) async fn on_upload(&self, chat_id: ChatId, upload: Upload) -> Result<()> {
        let config = self.config.read();
        let issued = self.intake.ingest(upload, &config).await?;
        self.reply_plain(chat_id, texts::link_created(&issued.locator))
            .await;
        self.reply_plain(chat_id, texts::caption_prompt(&issued.key, &issued.caption))
            .await;
        Ok(())
    }

    pub(super) async fn on_callback(&self, id: &str, chat_id: ChatId, data: &str) -> Result<()> {
        if let Err(e) = self.transport.answer_callback(id).await {
            warn!(chat_id, error = %e, "failed to answer callback query");
        }
        let bot_username = self.config.read().bot_username;
        let guide = match data {
            texts::GUIDE_UPLOAD_DATA => texts::guide_upload(&bot_username),
            texts::GUIDE_LINK_DATA => texts::guide_link(&bot_username),
            other => {
                debug!(chat_id, data = other, "ignoring unknown callback");
                return Ok(());
            },
        };
        self.transport
            .send_text(chat_id, OutgoingText::html(guide))
            .await?;
        Ok(())
    }
}
