//! Server execution logic.

use std::sync::Arc;

use futures_util::sink::SinkExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_util::codec::FramedWrite;

use crate::infrastructure::dto::wire::StatusReply;
use crate::infrastructure::framing::FrameCodec;
use crate::usecase::{
    BroadcastMessageUseCase, DisconnectUseCase, ListUsersUseCase, LoginUseCase,
    PrivateMessageUseCase, TypingUseCase,
};

use super::{handler::handle_connection, signal::shutdown_signal, state::AppState};

/// TCP chat relay server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     login_usecase,
///     disconnect_usecase,
///     broadcast_usecase,
///     private_message_usecase,
///     list_users_usecase,
///     typing_usecase,
///     256,
/// );
/// server.run("127.0.0.1".to_string(), 5000).await?;
/// ```
pub struct Server {
    login_usecase: Arc<LoginUseCase>,
    disconnect_usecase: Arc<DisconnectUseCase>,
    broadcast_usecase: Arc<BroadcastMessageUseCase>,
    private_message_usecase: Arc<PrivateMessageUseCase>,
    list_users_usecase: Arc<ListUsersUseCase>,
    typing_usecase: Arc<TypingUseCase>,
    /// Upper bound on concurrently served connections
    max_connections: usize,
}

impl Server {
    pub fn new(
        login_usecase: Arc<LoginUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
        broadcast_usecase: Arc<BroadcastMessageUseCase>,
        private_message_usecase: Arc<PrivateMessageUseCase>,
        list_users_usecase: Arc<ListUsersUseCase>,
        typing_usecase: Arc<TypingUseCase>,
        max_connections: usize,
    ) -> Self {
        Self {
            login_usecase,
            disconnect_usecase,
            broadcast_usecase,
            private_message_usecase,
            list_users_usecase,
            typing_usecase,
            max_connections,
        }
    }

    /// Run the chat relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 5000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Accept connections on an already-bound listener until a shutdown
    /// signal arrives.
    ///
    /// Split out of [`Server::run`] so tests can bind an ephemeral port
    /// themselves and drive the server from there.
    pub async fn serve(self, listener: TcpListener) {
        let state = Arc::new(AppState {
            login_usecase: self.login_usecase,
            disconnect_usecase: self.disconnect_usecase,
            broadcast_usecase: self.broadcast_usecase,
            private_message_usecase: self.private_message_usecase,
            list_users_usecase: self.list_users_usecase,
            typing_usecase: self.typing_usecase,
        });
        let permits = Arc::new(Semaphore::new(self.max_connections));

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            match permits.clone().try_acquire_owned() {
                                Ok(permit) => {
                                    tracing::info!("Accepted connection from {}", addr);
                                    let state = state.clone();
                                    tokio::spawn(async move {
                                        handle_connection(state, stream, addr).await;
                                        drop(permit);
                                    });
                                }
                                Err(_) => {
                                    tracing::warn!(
                                        "Connection limit reached, rejecting {}",
                                        addr
                                    );
                                    tokio::spawn(reject_connection(stream));
                                }
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }
    }
}

/// Tell a client the server is full, then drop the connection
async fn reject_connection(stream: TcpStream) {
    let mut writer = FramedWrite::new(stream, FrameCodec::default());
    let reply = StatusReply::error("server at capacity");
    let json = serde_json::to_string(&reply).unwrap();
    if let Err(e) = writer.send(json).await {
        tracing::debug!("Failed to send capacity rejection: {}", e);
    }
}
