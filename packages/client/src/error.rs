//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Display name is already in use on the server
    #[error("Name '{0}' is already in use")]
    DuplicateName(String),

    /// Server refused the login for a reason retries cannot fix
    #[error("Login rejected: {0}")]
    LoginRejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
