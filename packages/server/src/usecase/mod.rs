//! Application use cases.
//!
//! One struct per operation. Each holds its dependencies as `Arc<dyn _>`
//! trait objects so tests can substitute the repository, the pusher, or
//! the clock.

mod broadcast_message;
mod disconnect;
mod error;
mod list_users;
mod login;
mod private_message;
mod typing;

pub use broadcast_message::BroadcastMessageUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::{AuthError, BroadcastError, DisconnectError, RoutingError};
pub use list_users::ListUsersUseCase;
pub use login::LoginUseCase;
pub use private_message::PrivateMessageUseCase;
pub use typing::TypingUseCase;
