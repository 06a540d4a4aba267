//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement client decisions
//! without side effects, making them easy to test.

#![allow(dead_code)]

use crate::error::ClientError;

/// What the user asked for on one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Plain text, broadcast to the room
    Broadcast(String),
    /// `/msg <user> <text>`: a direct message
    Private { to: String, text: String },
    /// `/users`: ask for the roster
    Users,
    /// `/quit`: leave the chat
    Quit,
    /// A slash command the client does not understand
    Invalid(&'static str),
}

/// Interpret one line of user input.
///
/// Anything that does not start with `/` is a broadcast; the line arrives
/// already trimmed by the readline loop.
pub fn parse_input(line: &str) -> Input {
    if !line.starts_with('/') {
        return Input::Broadcast(line.to_string());
    }

    let mut parts = line.splitn(3, ' ');
    match parts.next() {
        Some("/quit") => Input::Quit,
        Some("/users") => Input::Users,
        Some("/msg") => match (parts.next(), parts.next()) {
            (Some(to), Some(text)) if !to.is_empty() => Input::Private {
                to: to.to_string(),
                text: text.to_string(),
            },
            _ => Input::Invalid("usage: /msg <user> <text>"),
        },
        _ => Input::Invalid("commands: /msg <user> <text>, /users, /quit"),
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// # Arguments
///
/// * `error` - The client error to check
///
/// # Returns
///
/// `true` if the error requires immediate exit (e.g., DuplicateName),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::DuplicateName(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
///
/// # Returns
///
/// `true` if reconnection should be attempted, `false` otherwise
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}
