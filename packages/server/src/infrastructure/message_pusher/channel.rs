//! Channel-backed MessagePusher implementation.
//!
//! ## Responsibilities
//!
//! - Hold the send half of every live session's outbound channel
//! - Deliver serialized frames to one client (`push_to`) or many
//!   (`broadcast`)
//!
//! ## Design notes
//!
//! Sockets are owned by the UI layer: each connection's writer task drains
//! the receiving half of its channel and performs the actual framed writes.
//! This implementation only ever touches channel senders, so no lock here
//! is ever held across network I/O. Fan-out snapshots the matching senders
//! under the lock and sends outside it; a sender whose receiving task has
//! gone away is pruned on the spot, and the dead session's own worker
//! teardown finishes the roster cleanup.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, UserName};

/// MessagePusher over per-session unbounded channels
pub struct ChannelMessagePusher {
    /// Send handles of the connected clients, keyed by display name
    clients: Arc<Mutex<HashMap<UserName, PusherChannel>>>,
}

impl ChannelMessagePusher {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for ChannelMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for ChannelMessagePusher {
    async fn register_client(&self, name: UserName, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(name.clone(), sender);
        tracing::debug!("client '{}' registered to MessagePusher", name);
    }

    async fn unregister_client(&self, name: &UserName) {
        let mut clients = self.clients.lock().await;
        clients.remove(name);
        tracing::debug!("client '{}' unregistered from MessagePusher", name);
    }

    async fn push_to(&self, name: &UserName, payload: &str) -> Result<(), MessagePushError> {
        let sender = {
            let clients = self.clients.lock().await;
            clients.get(name).cloned()
        };

        match sender {
            Some(sender) => {
                sender
                    .send(payload.to_string())
                    .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
                tracing::debug!("pushed message to client '{}'", name);
                Ok(())
            }
            None => Err(MessagePushError::ClientNotFound(name.to_string())),
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<UserName>,
        payload: &str,
    ) -> Result<(), MessagePushError> {
        // one synchronized pass: snapshot the senders, then send unlocked
        let snapshot: Vec<(UserName, PusherChannel)> = {
            let clients = self.clients.lock().await;
            let mut senders = Vec::with_capacity(targets.len());
            for name in targets {
                match clients.get(&name) {
                    Some(sender) => senders.push((name, sender.clone())),
                    None => {
                        tracing::debug!("client '{}' not found during broadcast, skipping", name)
                    }
                }
            }
            senders
        };

        let mut unreachable = Vec::new();
        for (name, sender) in snapshot {
            // partial failure is tolerated; the rest of the fan-out continues
            if sender.send(payload.to_string()).is_err() {
                tracing::warn!("client '{}' unreachable during broadcast, removing", name);
                unreachable.push(name);
            } else {
                tracing::debug!("broadcasted message to client '{}'", name);
            }
        }

        if !unreachable.is_empty() {
            let mut clients = self.clients.lock().await;
            for name in &unreachable {
                clients.remove(name);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn name(raw: &str) -> UserName {
        UserName::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // given:
        let pusher = ChannelMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(name("alice"), tx).await;

        // when:
        let result = pusher.push_to(&name("alice"), "hello").await;

        // then:
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // given:
        let pusher = ChannelMessagePusher::new();

        // when:
        let result = pusher.push_to(&name("nobody"), "hello").await;

        // then:
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::ClientNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_push_to_closed_channel_fails() {
        // given: a registered client whose receiver is gone
        let pusher = ChannelMessagePusher::new();
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        drop(rx);
        pusher.register_client(name("alice"), tx).await;

        // when:
        let result = pusher.push_to(&name("alice"), "hello").await;

        // then:
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::PushFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_targets() {
        // given:
        let pusher = ChannelMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(name("alice"), tx1).await;
        pusher.register_client(name("bob"), tx2).await;

        // when:
        let targets = vec![name("alice"), name("bob")];
        let result = pusher.broadcast(targets, "to everyone").await;

        // then:
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("to everyone".to_string()));
        assert_eq!(rx2.recv().await, Some("to everyone".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_skips_unknown_targets() {
        // given:
        let pusher = ChannelMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(name("alice"), tx).await;

        // when: one target was never registered
        let targets = vec![name("alice"), name("ghost")];
        let result = pusher.broadcast(targets, "still delivered").await;

        // then:
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("still delivered".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_prunes_unreachable_clients() {
        // given: bob's receiving task is gone
        let pusher = ChannelMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel::<String>();
        drop(rx2);
        pusher.register_client(name("alice"), tx1).await;
        pusher.register_client(name("bob"), tx2).await;

        // when:
        let targets = vec![name("alice"), name("bob")];
        let result = pusher.broadcast(targets, "partial").await;

        // then: alice still got the message and bob's handle was removed
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("partial".to_string()));
        assert!(matches!(
            pusher.push_to(&name("bob"), "again").await.unwrap_err(),
            MessagePushError::ClientNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // given:
        let pusher = ChannelMessagePusher::new();

        // when:
        let result = pusher.broadcast(vec![], "nobody listens").await;

        // then:
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unregister_removes_handle() {
        // given:
        let pusher = ChannelMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(name("alice"), tx).await;

        // when:
        pusher.unregister_client(&name("alice")).await;

        // then:
        assert!(matches!(
            pusher.push_to(&name("alice"), "hello").await.unwrap_err(),
            MessagePushError::ClientNotFound(_)
        ));
    }
}
