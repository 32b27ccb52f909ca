//! Recording fakes shared by the unit tests.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicI32, Ordering},
    },
};

use {
    async_trait::async_trait,
    secrecy::Secret,
    teloxide::{ApiError, RequestError},
    tempfile::TempDir,
    uploader_config::{ConfigStore, UploaderConfig},
    uploader_storage::{
        self as storage, ContentKind, ContentRecord, ContentRepository, LinkRecord,
        LinkRepository,
    },
};

use crate::{
    error::{Error, Result},
    transport::{ChatId, MemberStatus, MessageId, OutgoingText, Transport, UserId},
};

fn api_error(error: ApiError) -> Error {
    Error::Telegram(RequestError::Api(error))
}

/// Config store over a temp file with a complete sample config.
///
/// Keep the returned directory alive for as long as the store may persist.
pub(crate) fn config_store(
    customize: impl FnOnce(&mut UploaderConfig),
) -> (Arc<ConfigStore>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = UploaderConfig {
        api_token: Secret::new("123:ABC".into()),
        bot_username: "FilesBot".into(),
        default_tag: "#MyTag".into(),
        admin_password: Secret::new("secret".into()),
        delete_delay: 30,
        sponsored_channels: vec!["@news".into()],
        ..Default::default()
    };
    customize(&mut config);
    let store = ConfigStore::new(config, dir.path().join("config.yaml"));
    (Arc::new(store), dir)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Sent {
    Text {
        chat_id: ChatId,
        message: OutgoingText,
    },
    Media {
        chat_id: ChatId,
        kind: ContentKind,
        file_id: String,
        caption: String,
    },
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    next_id: AtomicI32,
    fail_text: AtomicBool,
    sent: Mutex<Vec<Sent>>,
    deleted: Mutex<Vec<(ChatId, MessageId)>>,
    failing_deletes: Mutex<HashSet<MessageId>>,
    statuses: Mutex<HashMap<String, MemberStatus>>,
    queries: Mutex<Vec<String>>,
    answered: Mutex<Vec<String>>,
}

impl FakeTransport {
    fn next_message_id(&self) -> MessageId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Status reported for `group`. Groups without one make the query fail.
    pub fn set_status(&self, group: &str, status: MemberStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(group.to_string(), status);
    }

    pub fn fail_text_sends(&self) {
        self.fail_text.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, message_id: MessageId) {
        self.failing_deletes.lock().unwrap().insert(message_id);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Bodies of every text message sent, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { message, .. } => Some(message.text),
                Sent::Media { .. } => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<(ChatId, MessageId)> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn membership_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn answered(&self) -> Vec<String> {
        self.answered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send_text(&self, chat_id: ChatId, message: OutgoingText) -> Result<MessageId> {
        if self.fail_text.load(Ordering::SeqCst) {
            return Err(api_error(ApiError::BotBlocked));
        }
        self.sent.lock().unwrap().push(Sent::Text { chat_id, message });
        Ok(self.next_message_id())
    }

    async fn send_media(
        &self,
        chat_id: ChatId,
        kind: ContentKind,
        file_id: &str,
        caption: &str,
    ) -> Result<MessageId> {
        self.sent.lock().unwrap().push(Sent::Media {
            chat_id,
            kind,
            file_id: file_id.to_string(),
            caption: caption.to_string(),
        });
        Ok(self.next_message_id())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        if self.failing_deletes.lock().unwrap().contains(&message_id) {
            return Err(api_error(ApiError::MessageToDeleteNotFound));
        }
        self.deleted.lock().unwrap().push((chat_id, message_id));
        Ok(())
    }

    async fn member_status(&self, group: &str, _user_id: UserId) -> Result<MemberStatus> {
        self.queries.lock().unwrap().push(group.to_string());
        self.statuses
            .lock()
            .unwrap()
            .get(group)
            .copied()
            .ok_or_else(|| api_error(ApiError::ChatNotFound))
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.answered.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryContent {
    records: Mutex<HashMap<String, ContentRecord>>,
    fail: AtomicBool,
    collide: AtomicBool,
    lookups: Mutex<Vec<String>>,
}

impl InMemoryContent {
    pub fn insert(&self, record: ContentRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.key.clone(), record);
    }

    pub fn record(&self, key: &str) -> Option<ContentRecord> {
        self.records.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.lock().unwrap().keys().cloned().collect()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    /// Make every subsequent call fail.
    pub fn fail_writes(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent `create` report a key collision.
    pub fn collide_keys(&self) {
        self.collide.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> storage::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(storage::Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for InMemoryContent {
    async fn create(&self, record: &ContentRecord) -> storage::Result<()> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        if self.collide.load(Ordering::SeqCst) || records.contains_key(&record.key) {
            return Err(storage::Error::DuplicateKey {
                key: record.key.clone(),
            });
        }
        records.insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn update_caption(&self, key: &str, caption: &str) -> storage::Result<bool> {
        self.check()?;
        Ok(match self.records.lock().unwrap().get_mut(key) {
            Some(record) => {
                record.caption = caption.to_string();
                true
            },
            None => false,
        })
    }

    async fn get(&self, key: &str) -> storage::Result<Option<ContentRecord>> {
        self.lookups.lock().unwrap().push(key.to_string());
        self.check()?;
        Ok(self.record(key))
    }
}

#[derive(Default)]
pub(crate) struct InMemoryLinks {
    links: Mutex<Vec<LinkRecord>>,
    fail: AtomicBool,
}

impl InMemoryLinks {
    pub fn urls(&self) -> Vec<String> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .map(|l| l.url.clone())
            .collect()
    }

    pub fn fail_writes(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinks {
    async fn create(&self, link: &LinkRecord) -> storage::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(storage::Error::Database(sqlx::Error::PoolTimedOut));
        }
        self.links.lock().unwrap().push(link.clone());
        Ok(())
    }
}
