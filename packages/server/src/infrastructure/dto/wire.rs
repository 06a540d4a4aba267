//! Wire message DTOs for the framed TCP protocol.
//!
//! Every frame payload is a JSON object. Client commands and server events
//! are tagged by `cmd`; the acknowledgement reply is the one tagless shape,
//! keyed by `status`. These types are the only ones that touch serde —
//! domain types convert through `conversion.rs`.

use serde::{Deserialize, Serialize};

/// Client → server commands, tagged by `cmd`.
///
/// Missing string fields default to `""`, mirroring how lenient the
/// protocol is about absent keys: a `login` without `user` is an empty-name
/// login, a `message` without `to` targets nobody. A recognizable object
/// with an unknown tag becomes [`ClientCommand::Unknown`] so the router can
/// answer it without dropping the connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum ClientCommand {
    Login {
        #[serde(default)]
        user: String,
    },
    Broadcast {
        #[serde(default)]
        msg: String,
    },
    Message {
        #[serde(default)]
        to: String,
        #[serde(default)]
        msg: String,
    },
    Users,
    Typing,
    Quit,
    #[serde(other)]
    Unknown,
}

impl ClientCommand {
    /// Interpret a decoded frame as a command.
    ///
    /// Fails when the object carries no usable `cmd` tag; the router
    /// answers that the same way as [`ClientCommand::Unknown`].
    pub fn from_frame(frame: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(frame)
    }
}

/// Server → client events, tagged by `cmd`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum ServerEvent {
    Broadcast { from: String, msg: String },
    Private { from: String, msg: String },
    Users { list: Vec<String> },
    Typing { user: String },
    History { items: Vec<HistoryItem> },
    System { msg: String },
}

/// One replayed broadcast inside a `history` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Wall-clock send time, `HH:MM:SS`
    pub time: String,
    pub from: String,
    pub msg: String,
}

/// Acknowledgement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Acknowledgement or error reply for a client request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: Status,
    pub msg: String,
}

impl StatusReply {
    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            msg: msg.into(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            msg: msg.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Any server → client frame, as the client parses it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Event(ServerEvent),
    Status(StatusReply),
}

impl ServerMessage {
    pub fn from_frame(frame: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(frame)
    }
}
