use teloxide::types::{
    CallbackQuery, MaybeInaccessibleMessage, MediaKind, Message, MessageKind, Update, UpdateKind,
};

use uploader_storage::ContentKind;

use crate::{
    command::split_command,
    transport::{ChatId, UserId},
};

/// An uploaded file as received from an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_id: String,
    pub kind: ContentKind,
    pub caption: String,
}

/// Inbound update reduced to what the dispatcher acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Callback {
        id: String,
        chat_id: ChatId,
        data: String,
    },
    Command {
        sender: UserId,
        chat_id: ChatId,
        /// Command name without the leading `/` or `@botname` suffix.
        name: String,
        /// Everything after the command token, leading whitespace trimmed.
        args: String,
    },
    Media {
        sender: UserId,
        chat_id: ChatId,
        upload: Upload,
    },
}

/// Callbacks first, then slash commands, then document/video/photo uploads.
/// Anything else yields `None`.
pub fn classify(update: Update) -> Option<Event> {
    match update.kind {
        UpdateKind::CallbackQuery(query) => from_callback(query),
        UpdateKind::Message(msg) => from_message(&msg),
        _ => None,
    }
}

fn from_callback(query: CallbackQuery) -> Option<Event> {
    let data = query.data.filter(|d| !d.is_empty())?;
    let chat_id = match query.message.as_ref()? {
        MaybeInaccessibleMessage::Regular(msg) => msg.chat.id.0,
        MaybeInaccessibleMessage::Inaccessible(_) => return None,
    };
    Some(Event::Callback {
        id: query.id,
        chat_id,
        data,
    })
}

fn from_message(msg: &Message) -> Option<Event> {
    let sender = msg.from.as_ref()?.id.0;
    let chat_id = msg.chat.id.0;

    if let Some((name, args)) = msg.text().and_then(split_command) {
        return Some(Event::Command {
            sender,
            chat_id,
            name: name.to_string(),
            args: args.to_string(),
        });
    }

    extract_upload(msg).map(|upload| Event::Media {
        sender,
        chat_id,
        upload,
    })
}

fn extract_upload(msg: &Message) -> Option<Upload> {
    let MessageKind::Common(common) = &msg.kind else {
        return None;
    };
    let (file_id, kind, caption) = match &common.media_kind {
        MediaKind::Document(d) => (&d.document.file.id, ContentKind::Document, &d.caption),
        MediaKind::Video(v) => (&v.video.file.id, ContentKind::Video, &v.caption),
        // Largest size comes last.
        MediaKind::Photo(p) => (&p.photo.last()?.file.id, ContentKind::Photo, &p.caption),
        _ => return None,
    };
    Some(Upload {
        file_id: file_id.clone(),
        kind,
        caption: caption.clone().unwrap_or_default(),
    })
}
