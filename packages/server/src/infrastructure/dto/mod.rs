//! Data Transfer Objects (DTOs) for the chat relay.
//!
//! - `wire`: framed TCP message DTOs
//! - `conversion`: mapping between DTOs and domain entities

pub mod conversion;
pub mod wire;
