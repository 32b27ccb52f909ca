use {
    async_trait::async_trait,
    teloxide::{
        payloads::{SendDocumentSetters, SendMessageSetters, SendPhotoSetters, SendVideoSetters},
        prelude::*,
        types::{
            ChatId, ChatMemberStatus, InlineKeyboardButton, InlineKeyboardMarkup, InputFile,
            MessageId, ParseMode, Recipient, UserId,
        },
    },
    tracing::debug,
};

use uploader_storage::ContentKind;

use crate::{
    error::{Error, Result},
    transport::{Button, Keyboard, MemberStatus, OutgoingText, Transport},
};

/// [`Transport`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn to_markup(keyboard: &Keyboard) -> Result<InlineKeyboardMarkup> {
    let rows = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(to_button).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()?;
    Ok(InlineKeyboardMarkup::new(rows))
}

fn to_button(button: &Button) -> Result<InlineKeyboardButton> {
    match button {
        Button::Callback { text, data } => {
            Ok(InlineKeyboardButton::callback(text.clone(), data.clone()))
        },
        Button::Url { text, url } => {
            let parsed = reqwest::Url::parse(url)
                .map_err(|e| Error::external(format!("invalid button url {url}"), e))?;
            Ok(InlineKeyboardButton::url(text.clone(), parsed))
        },
    }
}

fn to_member_status(status: ChatMemberStatus) -> MemberStatus {
    match status {
        ChatMemberStatus::Owner => MemberStatus::Creator,
        ChatMemberStatus::Administrator => MemberStatus::Administrator,
        ChatMemberStatus::Member => MemberStatus::Member,
        ChatMemberStatus::Restricted => MemberStatus::Restricted,
        ChatMemberStatus::Left => MemberStatus::Left,
        ChatMemberStatus::Banned => MemberStatus::Banned,
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, message: OutgoingText) -> Result<i32> {
        let mut req = self.bot.send_message(ChatId(chat_id), message.text);
        if message.html {
            req = req.parse_mode(ParseMode::Html);
        }
        if let Some(ref keyboard) = message.keyboard {
            req = req.reply_markup(to_markup(keyboard)?);
        }
        let sent = req.await?;
        Ok(sent.id.0)
    }

    async fn send_media(
        &self,
        chat_id: i64,
        kind: ContentKind,
        file_id: &str,
        caption: &str,
    ) -> Result<i32> {
        let chat = ChatId(chat_id);
        let file = InputFile::file_id(file_id.to_owned());
        let sent = match kind {
            ContentKind::Document => self.bot.send_document(chat, file).caption(caption).await?,
            ContentKind::Photo => self.bot.send_photo(chat, file).caption(caption).await?,
            ContentKind::Video => self.bot.send_video(chat, file).caption(caption).await?,
        };
        debug!(chat_id, %kind, message_id = sent.id.0, "sent stored content");
        Ok(sent.id.0)
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await?;
        Ok(())
    }

    async fn member_status(&self, group: &str, user_id: u64) -> Result<MemberStatus> {
        let member = self
            .bot
            .get_chat_member(
                Recipient::ChannelUsername(format!("@{group}")),
                UserId(user_id),
            )
            .await?;
        Ok(to_member_status(member.kind.status()))
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.bot.answer_callback_query(callback_id.to_owned()).await?;
        Ok(())
    }
}
