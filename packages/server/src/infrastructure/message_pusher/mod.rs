//! MessagePusher implementations.

pub mod channel;

pub use channel::ChannelMessagePusher;
