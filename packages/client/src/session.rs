//! TCP client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;

use charla_server::infrastructure::dto::wire::{ClientCommand, ServerEvent, ServerMessage};
use charla_server::infrastructure::framing::FrameCodec;

use crate::{
    domain::{Input, parse_input},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run one client session: connect, log in, then relay between the
/// terminal and the server until either side ends.
pub async fn run_client_session(
    host: &str,
    port: u16,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", host, port);

    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
    };

    let framed = Framed::new(stream, FrameCodec::default());
    let (mut write, mut read) = framed.split();

    // Log in before anything else; the server answers every login attempt
    let login = ClientCommand::Login {
        user: name.to_string(),
    };
    let login_json = serde_json::to_string(&login)?;
    if let Err(e) = write.send(login_json).await {
        return Err(Box::new(ClientError::ConnectionError(e.to_string())));
    }

    let first = match read.next().await {
        Some(Ok(frame)) => frame,
        Some(Err(e)) => {
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
        None => {
            return Err(Box::new(ClientError::ConnectionError(
                "server closed the connection during login".to_string(),
            )));
        }
    };

    match ServerMessage::from_frame(first) {
        Ok(ServerMessage::Status(reply)) if reply.is_ok() => {
            tracing::info!("Connected to chat relay!");
            println!("\n{}", reply.msg);
            println!(
                "Type to broadcast, /msg <user> <text> for a direct message, \
                 /users for the roster, /quit to leave.\n"
            );
        }
        Ok(ServerMessage::Status(reply)) => {
            // every status the server sends at this point is a refusal, and
            // none of them clears up by reconnecting
            if reply.msg.contains("in use") {
                return Err(Box::new(ClientError::DuplicateName(name.to_string())));
            }
            return Err(Box::new(ClientError::LoginRejected(reply.msg)));
        }
        Ok(_) | Err(_) => {
            return Err(Box::new(ClientError::ConnectionError(
                "unexpected reply to login".to_string(),
            )));
        }
    }

    // Clone name for read task
    let name_for_read = name.to_string();

    // Spawn a task to render incoming frames
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(frame) = read.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("Read error: {}", e);
                    connection_error = true;
                    break;
                }
            };

            let formatted = match ServerMessage::from_frame(frame.clone()) {
                Ok(ServerMessage::Event(event)) => match event {
                    ServerEvent::Broadcast { from, msg } => {
                        MessageFormatter::format_broadcast(&from, &msg)
                    }
                    ServerEvent::Private { from, msg } => {
                        MessageFormatter::format_private(&from, &msg)
                    }
                    ServerEvent::Users { list } => {
                        MessageFormatter::format_users(&list, &name_for_read)
                    }
                    ServerEvent::Typing { user } => MessageFormatter::format_typing(&user),
                    ServerEvent::History { items } => MessageFormatter::format_history(&items),
                    ServerEvent::System { msg } => MessageFormatter::format_system(&msg),
                },
                Ok(ServerMessage::Status(reply)) => MessageFormatter::format_status(&reply),
                Err(_) => MessageFormatter::format_raw_message(&frame.to_string()),
            };

            print!("{}", formatted);
            redisplay_prompt(&name_for_read);
        }

        connection_error
    });

    // Clone name for the input loop
    let name = name.to_string();
    let name_for_prompt = name.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", name_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn input lines into commands and send them
    let name_for_write = name.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        loop {
            let Some(line) = input_rx.recv().await else {
                // Readline ended without /quit (Ctrl+C or Ctrl+D); leave
                // politely so the others get a departure notice
                if let Ok(json) = serde_json::to_string(&ClientCommand::Quit) {
                    let _ = write.send(json).await;
                }
                break;
            };

            let command = match parse_input(&line) {
                Input::Broadcast(text) => ClientCommand::Broadcast { msg: text },
                Input::Private { to, text } => ClientCommand::Message { to, msg: text },
                Input::Users => ClientCommand::Users,
                Input::Quit => {
                    if let Ok(json) = serde_json::to_string(&ClientCommand::Quit) {
                        let _ = write.send(json).await;
                    }
                    break;
                }
                Input::Invalid(reason) => {
                    println!("{}", reason);
                    redisplay_prompt(&name_for_write);
                    continue;
                }
            };

            let json = match serde_json::to_string(&command) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize command: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(json).await {
                tracing::warn!("Failed to send command: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
