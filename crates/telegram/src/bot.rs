use std::time::Duration;

use {
    secrecy::ExposeSecret,
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, BotCommand},
    },
    tokio::sync::mpsc,
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use uploader_config::UploaderConfig;

use crate::error::{Error, Result};

/// Long-poll timeout in seconds. The HTTP client timeout must exceed it.
const POLL_TIMEOUT_SECS: u32 = 30;
const CLIENT_TIMEOUT: Duration = Duration::from_secs(45);
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);
const UPDATE_BUFFER: usize = 64;

/// Build a bot client, verify the token and prepare it for long polling.
pub async fn connect(config: &UploaderConfig) -> Result<Bot> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(CLIENT_TIMEOUT)
        .build()
        .map_err(|e| Error::external("failed to build Telegram HTTP client", e))?;
    let bot = Bot::with_client(config.api_token.expose_secret(), client);

    let me = bot.get_me().await?;
    let username = me.username.clone().unwrap_or_default();
    let configured = config.bot_username.trim_start_matches('@');
    if !username.eq_ignore_ascii_case(configured) {
        warn!(
            configured,
            actual = %username,
            "bot_username does not match the token's bot; share links will point elsewhere"
        );
    }

    // Long polling does not work while a webhook is set.
    bot.delete_webhook().send().await?;

    // Only public commands are advertised.
    let commands = vec![
        BotCommand::new("start", "Open a file link or show the welcome message"),
        BotCommand::new("help", "How to upload files and use links"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!(error = %e, "failed to register bot commands");
    }

    info!(username = %username, "telegram bot connected (webhook cleared)");
    Ok(bot)
}

/// Poll `getUpdates` in the background and forward every update in order.
///
/// Transient failures are retried after a pause. The channel closes when
/// `cancel` fires, the receiver is dropped, or another instance starts
/// polling with the same token.
pub fn spawn_polling(bot: Bot, cancel: CancellationToken) -> mpsc::Receiver<Update> {
    let (tx, rx) = mpsc::channel(UPDATE_BUFFER);
    tokio::spawn(async move {
        info!("starting telegram polling loop");
        let mut offset: i32 = 0;
        loop {
            let request = bot
                .get_updates()
                .offset(offset)
                .timeout(POLL_TIMEOUT_SECS)
                .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery]);
            let result = tokio::select! {
                () = cancel.cancelled() => break,
                result = request.send() => result,
            };

            match result {
                Ok(updates) => {
                    debug!(count = updates.len(), "got telegram updates");
                    for update in updates {
                        offset = update.id.as_offset();
                        if tx.send(update).await.is_err() {
                            debug!("update receiver dropped");
                            return;
                        }
                    }
                },
                Err(RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) => {
                    warn!("another instance is already polling with this token; stopping");
                    break;
                },
                Err(e) => {
                    warn!(error = %e, "telegram getUpdates failed");
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        () = tokio::time::sleep(POLL_RETRY_DELAY) => {},
                    }
                },
            }
        }
        info!("telegram polling stopped");
    });
    rx
}
