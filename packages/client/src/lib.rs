//! TCP chat client library.
//!
//! Connects to the chat relay, logs in with a display name, and bridges a
//! readline loop to the framed protocol.

mod domain;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::run_client;
