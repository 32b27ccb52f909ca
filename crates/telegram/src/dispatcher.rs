//! Single consumer of inbound updates.
//!
//! Updates are classified and handled strictly one at a time; only deferred
//! deletions run alongside the loop.

mod handlers;

use std::sync::Arc;

use {
    teloxide::types::Update,
    tokio::sync::mpsc,
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info},
};

use {
    uploader_config::ConfigStore,
    uploader_storage::{ContentRepository, LinkRepository},
};

use crate::{
    admin::AdminSessions,
    command::Command,
    error::{Error, Result},
    event::{Event, classify},
    gate::MembershipGate,
    intake::ContentIntake,
    scheduler::DeletionScheduler,
    transport::Transport,
};

pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    config: Arc<ConfigStore>,
    content: Arc<dyn ContentRepository>,
    sessions: AdminSessions,
    gate: MembershipGate,
    intake: ContentIntake,
    scheduler: DeletionScheduler,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// `cancel` stops the loop and drops pending deletions.
    pub fn new(
        transport: Arc<dyn Transport>,
        config: Arc<ConfigStore>,
        content: Arc<dyn ContentRepository>,
        links: Arc<dyn LinkRepository>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            gate: MembershipGate::new(Arc::clone(&transport), Arc::clone(&config)),
            intake: ContentIntake::new(Arc::clone(&content), links),
            scheduler: DeletionScheduler::new(Arc::clone(&transport), cancel.clone()),
            sessions: AdminSessions::new(),
            transport,
            config,
            content,
            cancel,
        }
    }

    pub fn sessions(&self) -> &AdminSessions {
        &self.sessions
    }

    /// Consume `updates` until cancelled or the source goes away.
    ///
    /// Cancellation is only observed between updates; a handler in flight
    /// always completes. A closed source is reported as
    /// [`Error::UpdatesClosed`].
    pub async fn run(&self, mut updates: mpsc::Receiver<Update>) -> Result<()> {
        info!(bot = %self.config.read().bot_username, "dispatcher ready");
        loop {
            let update = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    info!("shutdown requested");
                    return Ok(());
                },
                update = updates.recv() => update,
            };
            let Some(update) = update else {
                return Err(Error::UpdatesClosed);
            };
            match classify(update) {
                Some(event) => self.handle(event).await,
                None => debug!("ignoring update"),
            }
        }
    }

    /// Route one event to its handler. Failures are logged, never returned.
    pub async fn handle(&self, event: Event) {
        match event {
            Event::Callback { id, chat_id, data } => {
                if let Err(e) = self.on_callback(&id, chat_id, &data).await {
                    error!(chat_id, data = %data, error = %e, "error handling callback query");
                }
            },
            Event::Command {
                sender,
                chat_id,
                name,
                args,
            } => {
                let Some(command) = Command::parse(&name) else {
                    debug!(user_id = sender, command = %name, "ignoring unknown command");
                    return;
                };
                if command.is_admin_only() && !self.sessions.is_authenticated(sender) {
                    debug!(user_id = sender, ?command, "ignoring admin command from non-admin");
                    return;
                }
                if let Err(e) = self.on_command(command, sender, chat_id, &args).await {
                    error!(user_id = sender, chat_id, ?command, error = %e, "error handling command");
                }
            },
            Event::Media {
                sender,
                chat_id,
                upload,
            } => {
                if !self.sessions.is_authenticated(sender) {
                    debug!(user_id = sender, "ignoring upload from non-admin");
                    return;
                }
                if let Err(e) = self.on_upload(chat_id, upload).await {
                    error!(user_id = sender, chat_id, error = %e, "error handling upload");
                }
            },
        }
    }
}
