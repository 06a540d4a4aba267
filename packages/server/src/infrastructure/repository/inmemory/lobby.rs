//! In-memory LobbyRepository implementation.
//!
//! Wraps the domain [`Lobby`] in `Arc<Mutex<…>>`. Every trait method takes
//! the lock exactly once, mutates or reads in memory, and releases it —
//! no network I/O ever happens under this lock.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    HistoryEntry, Lobby, LobbyRepository, RepositoryError, Session, UserName,
};

pub struct InMemoryLobbyRepository {
    lobby: Arc<Mutex<Lobby>>,
}

impl InMemoryLobbyRepository {
    pub fn new(lobby: Arc<Mutex<Lobby>>) -> Self {
        Self { lobby }
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn add_session(&self, session: Session) -> Result<(), RepositoryError> {
        let name = session.name().to_string();
        let mut lobby = self.lobby.lock().await;
        lobby
            .add_session(session)
            .map_err(|_| RepositoryError::NameTaken(name))
    }

    async fn remove_session(&self, name: &UserName) -> Option<Session> {
        let mut lobby = self.lobby.lock().await;
        lobby.remove_session(name)
    }

    async fn find_session(&self, name: &UserName) -> Option<Session> {
        let lobby = self.lobby.lock().await;
        lobby.session(name).cloned()
    }

    async fn session_names(&self) -> Vec<UserName> {
        let lobby = self.lobby.lock().await;
        lobby.session_names()
    }

    async fn session_count(&self) -> usize {
        let lobby = self.lobby.lock().await;
        lobby.session_count()
    }

    async fn record_message(&self, entry: HistoryEntry) {
        let mut lobby = self.lobby.lock().await;
        lobby.record_message(entry);
    }

    async fn history_snapshot(&self) -> Vec<HistoryEntry> {
        let lobby = self.lobby.lock().await;
        lobby.history().snapshot()
    }
}
