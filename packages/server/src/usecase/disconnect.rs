//! UseCase: session disconnect.
//!
//! Removes a session from the roster and its send handle from the pusher,
//! then lets the caller notify whoever is left. Removal happens exactly once
//! per session: a second call for the same name reports `NotRegistered`, so
//! concurrent teardown paths (peer close, quit command, send failure) cannot
//! produce duplicate "left" notices.

use std::sync::Arc;

use crate::domain::{LobbyRepository, MessagePusher, UserName};

use super::error::{BroadcastError, DisconnectError};

/// Disconnect usecase
pub struct DisconnectUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Remove a session from the roster and the pusher.
    ///
    /// # Arguments
    ///
    /// * `name` - display name of the departing session
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<UserName>)` - the sessions that remain after removal
    /// * `Err(DisconnectError)` - the name was not registered (already
    ///   removed by another teardown path)
    pub async fn execute(&self, name: &UserName) -> Result<Vec<UserName>, DisconnectError> {
        // 1. remove the session; None means another path beat us to it
        if self.repository.remove_session(name).await.is_none() {
            return Err(DisconnectError::NotRegistered(name.to_string()));
        }

        // 2. drop the send handle
        self.message_pusher.unregister_client(name).await;

        // 3. the remaining roster is the notification target set
        Ok(self.repository.session_names().await)
    }

    /// Deliver a departure notice to the remaining sessions
    pub async fn notify_remaining(
        &self,
        targets: Vec<UserName>,
        message: &str,
    ) -> Result<(), BroadcastError> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| BroadcastError::FanOutFailed(e.to_string()))
    }
}
