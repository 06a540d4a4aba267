//! UseCase: session login.
//!
//! Registers an authenticated session in the roster and its send handle in
//! the pusher, and provides the fan-outs the join flow needs: the history
//! replay for the newcomer, the "joined" notice for everyone else, and the
//! roster update for everyone.

use std::net::SocketAddr;
use std::sync::Arc;

use charla_shared::time::Clock;

use crate::domain::{
    HistoryEntry, LobbyRepository, MessagePusher, PusherChannel, Session, Timestamp, UserName,
};

use super::error::{AuthError, BroadcastError};

/// Login usecase
pub struct LoginUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl LoginUseCase {
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

    /// Register a session under a unique name.
    ///
    /// # Arguments
    ///
    /// * `name` - validated display name of the connecting client
    /// * `addr` - remote address of the connection
    /// * `sender` - channel the session's writer task drains
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - connection time of the new session
    /// * `Err(AuthError)` - the name is already registered
    pub async fn execute(
        &self,
        name: UserName,
        addr: SocketAddr,
        sender: PusherChannel,
    ) -> Result<Timestamp, AuthError> {
        // 1. register the session; the roster enforces name uniqueness in
        //    a single critical section
        let connected_at = Timestamp::new(self.clock.now_utc_millis());
        let session = Session::new(name.clone(), addr, connected_at);
        self.repository
            .add_session(session)
            .await
            .map_err(|_| AuthError::NameTaken(name.to_string()))?;

        // 2. register the send handle
        self.message_pusher.register_client(name, sender).await;

        Ok(connected_at)
    }

    /// Replay history for a newly joined session, oldest first
    pub async fn history_snapshot(&self) -> Vec<HistoryEntry> {
        self.repository.history_snapshot().await
    }

    /// Current roster, sorted
    pub async fn roster(&self) -> Vec<UserName> {
        self.repository.session_names().await
    }

    /// Broadcast a "joined" notice to every session except the newcomer
    pub async fn broadcast_joined(
        &self,
        new_name: &UserName,
        message: &str,
    ) -> Result<(), BroadcastError> {
        let targets: Vec<UserName> = self
            .repository
            .session_names()
            .await
            .into_iter()
            .filter(|name| name != new_name)
            .collect();

        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| BroadcastError::FanOutFailed(e.to_string()))
    }

    /// Broadcast the current roster to everyone, newcomer included
    pub async fn broadcast_roster(&self, message: &str) -> Result<(), BroadcastError> {
        let targets = self.repository.session_names().await;
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| BroadcastError::FanOutFailed(e.to_string()))
    }
}
