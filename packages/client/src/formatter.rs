//! Message formatting utilities for client display.

use charla_server::infrastructure::dto::wire::{HistoryItem, StatusReply};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the history replay received right after login
    ///
    /// # Arguments
    ///
    /// * `items` - Replayed broadcasts, oldest first
    ///
    /// # Returns
    ///
    /// A formatted string with the recent messages
    pub fn format_history(items: &[HistoryItem]) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str("Recent messages:\n");

        if items.is_empty() {
            output.push_str("(none)\n");
        } else {
            for item in items {
                output.push_str(&format!("[{}] {}: {}\n", item.time, item.from, item.msg));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format the roster, marking the current client
    ///
    /// # Arguments
    ///
    /// * `list` - Display names of everyone connected, sorted
    /// * `current_name` - The current client's name (to mark as "me")
    ///
    /// # Returns
    ///
    /// A formatted string with the connected users
    pub fn format_users(list: &[String], current_name: &str) -> String {
        let mut output = String::new();
        output.push_str("\nConnected users:\n");

        for name in list {
            let me_suffix = if name == current_name { " (me)" } else { "" };
            output.push_str(&format!("  {}{}\n", name, me_suffix));
        }

        output
    }

    /// Format a room-wide broadcast
    pub fn format_broadcast(from: &str, msg: &str) -> String {
        format!("\n@{}: {}\n", from, msg)
    }

    /// Format a direct message addressed to this client
    pub fn format_private(from: &str, msg: &str) -> String {
        format!("\n[{} whispers] {}\n", from, msg)
    }

    /// Format a typing notice
    pub fn format_typing(user: &str) -> String {
        format!("\n* {} is typing...\n", user)
    }

    /// Format a server presence notice (joins and departures)
    pub fn format_system(msg: &str) -> String {
        format!("\n* {}\n", msg)
    }

    /// Format an acknowledgement or error reply
    pub fn format_status(reply: &StatusReply) -> String {
        if reply.is_ok() {
            format!("\n+ {}\n", reply.msg)
        } else {
            format!("\n! {}\n", reply.msg)
        }
    }

    /// Format a frame the client could not interpret
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
