//! coachdesk identity service and document store.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin coachdesk-server -- --port 8080 --custom-token abc=coach
//! ```

use clap::Parser;
use coachdesk_server::ServerArgs;
use coachdesk_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = coachdesk_server::run_server(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
