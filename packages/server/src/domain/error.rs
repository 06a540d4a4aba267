//! Error types owned by the domain layer.
//!
//! Outer layers map these into their own error enums; the wire-facing text of
//! each variant is what clients see in `status=error` replies.

use thiserror::Error;

/// Validation and invariant violations raised by domain types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("name must not be empty")]
    EmptyUserName,

    #[error("name exceeds {max} characters")]
    UserNameTooLong { max: usize },

    #[error("message exceeds {max} characters")]
    MessageTooLong { max: usize },

    #[error("name in use")]
    NameTaken(String),
}

/// Errors raised by repository implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("name in use")]
    NameTaken(String),
}

/// Errors raised when pushing messages to connected clients
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("client '{0}' is not connected")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
