//! UseCase: typing indicator relay.
//!
//! Ephemeral by design: the indicator reaches everyone except the typist
//! and is never recorded in history.

use std::sync::Arc;

use crate::domain::{LobbyRepository, MessagePusher, UserName};

use super::error::BroadcastError;

/// Typing indicator usecase
pub struct TypingUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl TypingUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Relay a typing notice to every session except the typist.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<UserName>)` - the sessions the notice was addressed to
    /// * `Err(BroadcastError)` - the fan-out failed wholesale
    pub async fn execute(
        &self,
        typist: &UserName,
        message: &str,
    ) -> Result<Vec<UserName>, BroadcastError> {
        let targets: Vec<UserName> = self
            .repository
            .session_names()
            .await
            .into_iter()
            .filter(|name| name != typist)
            .collect();

        self.message_pusher
            .broadcast(targets.clone(), message)
            .await
            .map_err(|e| BroadcastError::FanOutFailed(e.to_string()))?;

        Ok(targets)
    }
}
