//! Shared utilities for the Charla chat relay workspace.

pub mod logger;
pub mod time;
