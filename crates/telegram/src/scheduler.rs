use std::{sync::Arc, time::Duration};

use {
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{debug, warn},
};

use crate::transport::{ChatId, MessageId, Transport};

/// Deletes delivered messages after a delay, independently of the dispatch
/// loop.
///
/// Deletion is best-effort: failures are logged, never retried, and pending
/// timers are dropped when `cancel` fires.
pub struct DeletionScheduler {
    transport: Arc<dyn Transport>,
    cancel: CancellationToken,
}

impl DeletionScheduler {
    pub fn new(transport: Arc<dyn Transport>, cancel: CancellationToken) -> Self {
        Self { transport, cancel }
    }

    /// Arm one timer that deletes every id in `message_ids` once `delay`
    /// elapses.
    pub fn schedule(
        &self,
        chat_id: ChatId,
        message_ids: Vec<MessageId>,
        delay: Duration,
    ) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        let cancel = self.cancel.clone();
        debug!(chat_id, ?message_ids, delay_secs = delay.as_secs(), "deletion scheduled");
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(chat_id, ?message_ids, "scheduled deletion abandoned");
                    return;
                },
                () = tokio::time::sleep(delay) => {},
            }
            for message_id in message_ids {
                if let Err(e) = transport.delete_message(chat_id, message_id).await {
                    warn!(chat_id, message_id, error = %e, "failed to delete message");
                }
            }
        })
    }
}
