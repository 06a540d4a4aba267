//! TCP connection handlers.
//!
//! Each connection runs the same lifecycle: an unauthenticated phase that
//! only accepts `login` (or `quit`), then an authenticated session with one
//! reader task and one writer task. The writer task owns the write half of
//! the socket exclusively, so every frame a session receives goes through
//! its channel and frames are never interleaved.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::{
    domain::{MessageText, PusherChannel, UserName},
    infrastructure::dto::conversion::{HISTORY_FRAME_BUDGET, history_to_frames, roster_to_list},
    infrastructure::dto::wire::{ClientCommand, HistoryItem, ServerEvent, StatusReply},
    infrastructure::framing::{FrameCodec, FramingError},
    ui::state::AppState,
};

type Reader = FramedRead<OwnedReadHalf, FrameCodec>;
type Writer = FramedWrite<OwnedWriteHalf, FrameCodec>;

/// Drive one client connection from accept to teardown
pub async fn handle_connection(state: Arc<AppState>, stream: TcpStream, addr: SocketAddr) {
    let (read_half, write_half) = stream.into_split();
    let mut reader = FramedRead::new(read_half, FrameCodec::default());
    let mut writer = FramedWrite::new(write_half, FrameCodec::default());

    match login_phase(&state, &mut reader, &mut writer, addr).await {
        Some((name, tx, rx)) => {
            run_session(state, reader, writer, name, tx, rx).await;
        }
        None => {
            tracing::info!("Connection from {} closed before authentication", addr);
        }
    }
}

/// Drive a connection through authentication.
///
/// A premature command or an unrecognized one leaves the connection open so
/// the client can still log in. Returns `None` when the connection must
/// close without a session: peer EOF, a framing violation, an unusable or
/// taken name, or an explicit quit.
async fn login_phase(
    state: &Arc<AppState>,
    reader: &mut Reader,
    writer: &mut Writer,
    addr: SocketAddr,
) -> Option<(UserName, PusherChannel, mpsc::UnboundedReceiver<String>)> {
    while let Some(frame) = reader.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Framing violation from {}: {}", addr, e);
                return None;
            }
        };

        let command = match ClientCommand::from_frame(frame) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!("Unparseable command from {}: {}", addr, e);
                send_status(writer, StatusReply::error("unrecognized command"))
                    .await
                    .ok()?;
                continue;
            }
        };

        match command {
            ClientCommand::Login { user } => {
                let name = match UserName::new(user) {
                    Ok(name) => name,
                    Err(e) => {
                        tracing::warn!("Unusable name from {}: {}", addr, e);
                        let _ = send_status(writer, StatusReply::error(e.to_string())).await;
                        return None;
                    }
                };

                let (tx, rx) = mpsc::unbounded_channel();
                match state
                    .login_usecase
                    .execute(name.clone(), addr, tx.clone())
                    .await
                {
                    Ok(_connected_at) => {
                        tracing::info!("Client '{}' logged in from {}", name, addr);
                        return Some((name, tx, rx));
                    }
                    Err(e) => {
                        tracing::warn!("Login '{}' from {} rejected: {}", name, addr, e);
                        let _ = send_status(writer, StatusReply::error(e.to_string())).await;
                        return None;
                    }
                }
            }
            ClientCommand::Quit => {
                tracing::info!("Client at {} quit before logging in", addr);
                return None;
            }
            ClientCommand::Unknown => {
                send_status(writer, StatusReply::error("unrecognized command"))
                    .await
                    .ok()?;
            }
            _ => {
                send_status(writer, StatusReply::error("not authenticated"))
                    .await
                    .ok()?;
            }
        }
    }

    None
}

/// Run an authenticated session until the peer leaves or fails.
///
/// The welcome and the history replay are written directly, then the writer
/// moves into the pusher task; everything the session receives after that
/// point is queued on its channel, which preserves the order the join flow
/// promises (welcome, history, then live traffic).
async fn run_session(
    state: Arc<AppState>,
    mut reader: Reader,
    mut writer: Writer,
    name: UserName,
    tx: PusherChannel,
    rx: mpsc::UnboundedReceiver<String>,
) {
    // Welcome the newcomer and replay the recorded history
    {
        let welcome = StatusReply::ok(format!("Welcome, {}!", name));
        if let Err(e) = send_status(&mut writer, welcome).await {
            tracing::error!("Failed to send welcome to '{}': {}", name, e);
            finish_session(&state, &name).await;
            return;
        }

        let items: Vec<HistoryItem> = state
            .login_usecase
            .history_snapshot()
            .await
            .into_iter()
            .map(HistoryItem::from)
            .collect();
        // a long replay cannot ride in one frame; send it in bounded chunks
        for history_json in history_to_frames(items, HISTORY_FRAME_BUDGET) {
            if let Err(e) = writer.send(history_json).await {
                tracing::error!("Failed to send history to '{}': {}", name, e);
                finish_session(&state, &name).await;
                return;
            }
        }
        tracing::info!("Sent welcome and history to '{}'", name);
    }

    // Tell the others about the newcomer, then give everyone the new roster.
    // The newcomer's copy of the roster queues on its channel and is drained
    // once the pusher task starts.
    {
        let joined = ServerEvent::System {
            msg: format!("{} joined the chat", name),
        };
        let joined_json = serde_json::to_string(&joined).unwrap();
        if let Err(e) = state.login_usecase.broadcast_joined(&name, &joined_json).await {
            tracing::warn!("Failed to broadcast join notice for '{}': {}", name, e);
        }

        let roster = ServerEvent::Users {
            list: roster_to_list(state.login_usecase.roster().await),
        };
        let roster_json = serde_json::to_string(&roster).unwrap();
        if let Err(e) = state.login_usecase.broadcast_roster(&roster_json).await {
            tracing::warn!("Failed to broadcast roster after '{}' joined: {}", name, e);
        }
    }

    // From here on the writer belongs to the pusher task
    let mut send_task = pusher_loop(rx, writer);

    let session_name = name.clone();
    let state_clone = state.clone();

    // Read and dispatch commands from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = reader.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("Framing violation from '{}': {}", session_name, e);
                    break;
                }
            };

            let command = match ClientCommand::from_frame(frame) {
                Ok(command) => command,
                Err(e) => {
                    tracing::debug!("Unparseable command from '{}': {}", session_name, e);
                    if reply(&tx, StatusReply::error("unrecognized command")).is_err() {
                        break;
                    }
                    continue;
                }
            };

            match command {
                ClientCommand::Login { .. } => {
                    if reply(&tx, StatusReply::error("already authenticated")).is_err() {
                        break;
                    }
                }
                ClientCommand::Broadcast { msg } => {
                    let text = match MessageText::new(msg) {
                        Ok(text) => text,
                        Err(e) => {
                            if reply(&tx, StatusReply::error(e.to_string())).is_err() {
                                break;
                            }
                            continue;
                        }
                    };

                    let event = ServerEvent::Broadcast {
                        from: session_name.to_string(),
                        msg: text.as_str().to_string(),
                    };
                    let event_json = serde_json::to_string(&event).unwrap();
                    if let Err(e) = state_clone
                        .broadcast_usecase
                        .execute(session_name.clone(), text, &event_json)
                        .await
                    {
                        tracing::warn!("Broadcast from '{}' failed: {}", session_name, e);
                    }
                }
                ClientCommand::Message { to, msg } => {
                    let recipient = match UserName::new(to) {
                        Ok(recipient) => recipient,
                        Err(_) => {
                            // an unusable name cannot belong to anyone
                            if reply(&tx, StatusReply::error("user not available")).is_err() {
                                break;
                            }
                            continue;
                        }
                    };
                    let text = match MessageText::new(msg) {
                        Ok(text) => text,
                        Err(e) => {
                            if reply(&tx, StatusReply::error(e.to_string())).is_err() {
                                break;
                            }
                            continue;
                        }
                    };

                    let event = ServerEvent::Private {
                        from: session_name.to_string(),
                        msg: text.into_string(),
                    };
                    let event_json = serde_json::to_string(&event).unwrap();
                    let outcome = match state_clone
                        .private_message_usecase
                        .execute(&recipient, &event_json)
                        .await
                    {
                        Ok(()) => StatusReply::ok("delivered"),
                        Err(e) => StatusReply::error(e.to_string()),
                    };
                    if reply(&tx, outcome).is_err() {
                        break;
                    }
                }
                ClientCommand::Users => {
                    let roster = ServerEvent::Users {
                        list: roster_to_list(state_clone.list_users_usecase.execute().await),
                    };
                    let roster_json = serde_json::to_string(&roster).unwrap();
                    if tx.send(roster_json).is_err() {
                        break;
                    }
                }
                ClientCommand::Typing => {
                    let event = ServerEvent::Typing {
                        user: session_name.to_string(),
                    };
                    let event_json = serde_json::to_string(&event).unwrap();
                    if let Err(e) = state_clone
                        .typing_usecase
                        .execute(&session_name, &event_json)
                        .await
                    {
                        tracing::warn!("Typing relay from '{}' failed: {}", session_name, e);
                    }
                }
                ClientCommand::Quit => {
                    tracing::info!("Client '{}' requested quit", session_name);
                    break;
                }
                ClientCommand::Unknown => {
                    if reply(&tx, StatusReply::error("unrecognized command")).is_err() {
                        break;
                    }
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    finish_session(&state, &name).await;
}

/// Spawns the task that drains a session's channel into the TCP writer.
///
/// This is the only task that touches the write half after login, so frames
/// from concurrent senders are never interleaved.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames addressed to this session
/// * `writer` - Framed write half of this session's socket
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut writer: Writer,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the frame to this client
            if writer.send(msg).await.is_err() {
                break;
            }
        }
    })
}

/// Remove the session and tell the survivors.
///
/// Removal is exactly-once: when another teardown path already removed the
/// session, the departure notices are skipped.
async fn finish_session(state: &Arc<AppState>, name: &UserName) {
    match state.disconnect_usecase.execute(name).await {
        Ok(remaining) => {
            tracing::info!("Client '{}' disconnected and removed from registry", name);

            let left = ServerEvent::System {
                msg: format!("{} left the chat", name),
            };
            let left_json = serde_json::to_string(&left).unwrap();
            if let Err(e) = state
                .disconnect_usecase
                .notify_remaining(remaining.clone(), &left_json)
                .await
            {
                tracing::warn!("Failed to broadcast departure of '{}': {}", name, e);
            }

            let roster = ServerEvent::Users {
                list: roster_to_list(remaining.clone()),
            };
            let roster_json = serde_json::to_string(&roster).unwrap();
            if let Err(e) = state
                .disconnect_usecase
                .notify_remaining(remaining, &roster_json)
                .await
            {
                tracing::warn!("Failed to broadcast roster after '{}' left: {}", name, e);
            }
        }
        Err(e) => {
            tracing::debug!("Disconnect for '{}' skipped: {}", name, e);
        }
    }
}

/// Serialize a reply and queue it on the session's own channel
fn reply(tx: &PusherChannel, status: StatusReply) -> Result<(), mpsc::error::SendError<String>> {
    let json = serde_json::to_string(&status).unwrap();
    tx.send(json)
}

/// Serialize a reply and write it directly; only valid before the writer
/// moves into the pusher task
async fn send_status(writer: &mut Writer, status: StatusReply) -> Result<(), FramingError> {
    let json = serde_json::to_string(&status).unwrap();
    writer.send(json).await
}
