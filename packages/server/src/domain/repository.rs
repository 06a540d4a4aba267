//! Repository trait definition.
//!
//! The domain layer defines the data-access interface it needs; the
//! infrastructure layer provides the concrete implementation (dependency
//! inversion). Every operation is one synchronized pass over in-memory
//! state — implementations must never hold their lock across network I/O.

use async_trait::async_trait;

use super::{HistoryEntry, RepositoryError, Session, UserName};

/// Lobby repository trait.
///
/// The usecase layer depends on this trait, never on the concrete
/// infrastructure implementation.
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// Register a session; fails with `NameTaken` if the name is present
    async fn add_session(&self, session: Session) -> Result<(), RepositoryError>;

    /// Remove a session by name; returns the removed session, or `None` if
    /// it was already gone (idempotent)
    async fn remove_session(&self, name: &UserName) -> Option<Session>;

    /// Look up a session by name
    async fn find_session(&self, name: &UserName) -> Option<Session>;

    /// Names of all registered sessions, sorted
    async fn session_names(&self) -> Vec<UserName>;

    /// Number of registered sessions
    async fn session_count(&self) -> usize;

    /// Append a broadcast message to the replay history
    async fn record_message(&self, entry: HistoryEntry);

    /// Owned copy of the replay history, oldest first
    async fn history_snapshot(&self) -> Vec<HistoryEntry>;
}
