//! Error types of the usecase layer.
//!
//! Variant display strings double as the `msg` text of `status=error`
//! replies, so they are worded for clients, not for logs.

use thiserror::Error;

/// Login failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("name in use")]
    NameTaken(String),
}

/// Private-message routing failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("user not available")]
    UserNotAvailable(String),
}

/// Disconnecting a session that is no longer registered
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    #[error("session '{0}' is not registered")]
    NotRegistered(String),
}

/// Fan-out failures surfaced by the pusher
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    #[error("broadcast failed: {0}")]
    FanOutFailed(String),
}
