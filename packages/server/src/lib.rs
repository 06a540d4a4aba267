//! TCP chat relay library.
//!
//! This library provides the server implementation of a framed-TCP chat
//! relay with room-wide broadcast, direct messages, presence notices, and
//! history replay for late joiners.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
