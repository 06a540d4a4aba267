//! Entities of the chat relay domain.
//!
//! `Lobby` is the aggregate root: it owns the session roster and the bounded
//! history, and it is the only place the name-uniqueness invariant is
//! enforced. Send handles for live connections are not part of the domain;
//! they live in the infrastructure pusher, keyed by the same name.

use std::collections::HashMap;
use std::net::SocketAddr;

use super::error::DomainError;
use super::history::History;
use super::value_object::{MessageText, Timestamp, UserName};

/// One authenticated connection.
///
/// Created on successful login, removed when the connection closes, errors
/// or quits. The routing worker never mutates a registered session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    name: UserName,
    addr: SocketAddr,
    connected_at: Timestamp,
}

impl Session {
    pub fn new(name: UserName, addr: SocketAddr, connected_at: Timestamp) -> Self {
        Self {
            name,
            addr,
            connected_at,
        }
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }
}

/// Immutable record of one broadcast message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    sender: UserName,
    text: MessageText,
    timestamp: Timestamp,
}

impl HistoryEntry {
    pub fn new(sender: UserName, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            sender,
            text,
            timestamp,
        }
    }

    pub fn sender(&self) -> &UserName {
        &self.sender
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// The single chat lobby: session roster plus replay history.
///
/// Plain data with synchronous methods; concurrency control is the
/// repository's concern.
#[derive(Debug)]
pub struct Lobby {
    sessions: HashMap<UserName, Session>,
    history: History,
}

impl Lobby {
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            history: History::new(max_history),
        }
    }

    /// Register a session. Fails if the name is already present; the check
    /// and the insert happen in one step, so callers need no pre-check.
    pub fn add_session(&mut self, session: Session) -> Result<(), DomainError> {
        if self.sessions.contains_key(session.name()) {
            return Err(DomainError::NameTaken(session.name().to_string()));
        }
        self.sessions.insert(session.name().clone(), session);
        Ok(())
    }

    /// Remove a session by name. Idempotent: removing an absent name is a
    /// no-op returning `None`.
    pub fn remove_session(&mut self, name: &UserName) -> Option<Session> {
        self.sessions.remove(name)
    }

    pub fn session(&self, name: &UserName) -> Option<&Session> {
        self.sessions.get(name)
    }

    /// Names of all registered sessions, sorted for deterministic presence
    /// lists
    pub fn session_names(&self) -> Vec<UserName> {
        let mut names: Vec<UserName> = self.sessions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Append a broadcast message to the history, evicting the oldest entry
    /// when full
    pub fn record_message(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}
