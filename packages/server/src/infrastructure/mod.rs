//! Infrastructure layer: framing, wire DTOs, and the concrete repository
//! and pusher implementations.

pub mod dto;
pub mod framing;
pub mod message_pusher;
pub mod repository;
