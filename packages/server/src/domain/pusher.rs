//! Message pusher trait definition.
//!
//! A pusher owns the send side of every live connection. Each session's
//! handle is the sending half of an unbounded channel of serialized frames;
//! the receiving half is drained by that session's writer task, which owns
//! the socket. Pushing a message therefore never blocks on network I/O.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, UserName};

/// Send handle for one session: serialized JSON payloads in, frames out
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Interface for delivering serialized frames to connected clients.
///
/// `broadcast` tolerates per-recipient failure: an unreachable target never
/// aborts the fan-out to the others.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Associate a session name with its send handle
    async fn register_client(&self, name: UserName, sender: PusherChannel);

    /// Drop the send handle for a name (idempotent)
    async fn unregister_client(&self, name: &UserName);

    /// Deliver a payload to one session
    async fn push_to(&self, name: &UserName, payload: &str) -> Result<(), MessagePushError>;

    /// Deliver a payload to every target, skipping and pruning unreachable
    /// ones
    async fn broadcast(&self, targets: Vec<UserName>, payload: &str)
    -> Result<(), MessagePushError>;
}
