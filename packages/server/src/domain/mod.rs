//! Domain layer: value objects, entities, and the traits the relay core
//! depends on.

pub mod entity;
pub mod error;
pub mod history;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{HistoryEntry, Lobby, Session};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use history::History;
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::LobbyRepository;
pub use value_object::{MessageText, Timestamp, UserName};

#[cfg(test)]
pub use pusher::MockMessagePusher;
