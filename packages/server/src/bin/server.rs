//! TCP chat relay server.
//!
//! Accepts framed JSON commands from clients and relays chat traffic:
//! room-wide broadcasts, direct messages, presence notices, and a replay of
//! recent history for late joiners.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin charla-server
//! cargo run --bin charla-server -- --host 0.0.0.0 --port 6000
//! ```

use std::sync::Arc;

use charla_server::{
    domain::Lobby,
    infrastructure::{message_pusher::ChannelMessagePusher, repository::InMemoryLobbyRepository},
    ui::Server,
    usecase::{
        BroadcastMessageUseCase, DisconnectUseCase, ListUsersUseCase, LoginUseCase,
        PrivateMessageUseCase, TypingUseCase,
    },
};
use charla_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "TCP chat relay server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "5000")]
    port: u16,

    /// Number of recent broadcasts replayed to late joiners
    #[arg(long, default_value = "100")]
    max_history: usize,

    /// Upper bound on concurrently served connections
    #[arg(long, default_value = "256")]
    max_connections: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Clock
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory database)
    let lobby = Arc::new(Mutex::new(Lobby::new(args.max_history)));
    let repository = Arc::new(InMemoryLobbyRepository::new(lobby));

    // 2. Create MessagePusher (channel implementation)
    let message_pusher = Arc::new(ChannelMessagePusher::new());

    // 3. Create Clock
    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let login_usecase = Arc::new(LoginUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let broadcast_usecase = Arc::new(BroadcastMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let private_message_usecase = Arc::new(PrivateMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let list_users_usecase = Arc::new(ListUsersUseCase::new(repository.clone()));
    let typing_usecase = Arc::new(TypingUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));

    // 5. Create and run the server
    let server = Server::new(
        login_usecase,
        disconnect_usecase,
        broadcast_usecase,
        private_message_usecase,
        list_users_usecase,
        typing_usecase,
        args.max_connections,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
