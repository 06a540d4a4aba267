//! UseCase: direct message to one session.
//!
//! Resolves the target in the roster and delivers through the pusher. A
//! target that is registered but unreachable (its writer task already died)
//! is reported the same way as an unknown name, so the sender sees one
//! uniform "user not available" outcome.

use std::sync::Arc;

use crate::domain::{LobbyRepository, MessagePusher, UserName};

use super::error::RoutingError;

/// Private message usecase
pub struct PrivateMessageUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl PrivateMessageUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Deliver a frame to a single named session.
    ///
    /// # Arguments
    ///
    /// * `to` - display name of the recipient
    /// * `message` - serialized frame to deliver (built by the caller)
    ///
    /// # Returns
    ///
    /// * `Ok(())` - handed to the recipient's writer task
    /// * `Err(RoutingError)` - no such session, or its channel is gone
    pub async fn execute(&self, to: &UserName, message: &str) -> Result<(), RoutingError> {
        // 1. the roster is the source of truth for who exists
        if self.repository.find_session(to).await.is_none() {
            return Err(RoutingError::UserNotAvailable(to.to_string()));
        }

        // 2. deliver; a dead channel means the session is on its way out
        self.message_pusher.push_to(to, message).await.map_err(|e| {
            tracing::warn!("direct delivery to '{}' failed: {}", to, e);
            RoutingError::UserNotAvailable(to.to_string())
        })
    }
}
