//! UseCase: roster query.

use std::sync::Arc;

use crate::domain::{LobbyRepository, UserName};

/// Roster query usecase
pub struct ListUsersUseCase {
    repository: Arc<dyn LobbyRepository>,
}

impl ListUsersUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// Names of every connected session, sorted
    pub async fn execute(&self) -> Vec<UserName> {
        self.repository.session_names().await
    }
}
