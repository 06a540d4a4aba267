//! Terminal chat client with reconnection support.
//!
//! Connects to the chat relay, logs in with a display name, and sends
//! whatever you type as a broadcast. `/msg <user> <text>` sends a direct
//! message, `/users` prints the roster, `/quit` leaves.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval). A name that is already in use is rejected by the server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin charla-client -- --name Alice
//! cargo run --bin charla-client -- -n Bob -p 6000
//! ```

use clap::Parser;

use charla_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Terminal chat client with broadcast and direct messages", long_about = None)]
struct Args {
    /// Display name in the chat (must be unique)
    #[arg(short = 'n', long)]
    name: String,

    /// Server host to connect to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to connect to
    #[arg(short = 'p', long, default_value = "5000")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = charla_client::run_client(args.host, args.port, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
