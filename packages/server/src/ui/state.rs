//! Server state shared across connection tasks.

use std::sync::Arc;

use crate::usecase::{
    BroadcastMessageUseCase, DisconnectUseCase, ListUsersUseCase, LoginUseCase,
    PrivateMessageUseCase, TypingUseCase,
};

/// Shared application state
pub struct AppState {
    /// UseCase for session login
    pub login_usecase: Arc<LoginUseCase>,
    /// UseCase for session disconnect
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// UseCase for room-wide message broadcast
    pub broadcast_usecase: Arc<BroadcastMessageUseCase>,
    /// UseCase for direct messages
    pub private_message_usecase: Arc<PrivateMessageUseCase>,
    /// UseCase for roster queries
    pub list_users_usecase: Arc<ListUsersUseCase>,
    /// UseCase for typing indicators
    pub typing_usecase: Arc<TypingUseCase>,
}
