//! UseCase: room-wide message broadcast.
//!
//! Records the message in the replay history, then fans the serialized
//! frame out to every session, the sender included. The sender hearing its
//! own message back is the delivery acknowledgement the original protocol
//! relies on, so the target set is never filtered here.

use std::sync::Arc;

use charla_shared::time::Clock;

use crate::domain::{
    HistoryEntry, LobbyRepository, MessagePusher, MessageText, Timestamp, UserName,
};

use super::error::BroadcastError;

/// Broadcast usecase
pub struct BroadcastMessageUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl BroadcastMessageUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// Record a message and deliver it to every session.
    ///
    /// # Arguments
    ///
    /// * `from` - display name of the sender
    /// * `text` - validated message body, recorded in history
    /// * `message` - serialized frame to deliver (built by the caller)
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<UserName>)` - the sessions the frame was addressed to
    /// * `Err(BroadcastError)` - the fan-out failed wholesale
    pub async fn execute(
        &self,
        from: UserName,
        text: MessageText,
        message: &str,
    ) -> Result<Vec<UserName>, BroadcastError> {
        // 1. record in history; the ring evicts the oldest entry on its own
        let timestamp = Timestamp::new(self.clock.now_utc_millis());
        let entry = HistoryEntry::new(from, text, timestamp);
        self.repository.record_message(entry).await;

        // 2. deliver to the whole roster, sender included
        let targets = self.repository.session_names().await;
        self.message_pusher
            .broadcast(targets.clone(), message)
            .await
            .map_err(|e| BroadcastError::FanOutFailed(e.to_string()))?;

        Ok(targets)
    }
}
