//! Terminal front end for the coachdesk site.
//!
//! Run with:
//! ```not_rust
//! COACHDESK_STORE_CONFIG='{"endpoint":"http://127.0.0.1:8080"}' COACHDESK_APP_ID=coach-site \
//!     cargo run --bin coachdesk-client
//! cargo run --bin coachdesk-client -- --offline
//! ```

use clap::Parser;
use coachdesk_client::ClientArgs;
use coachdesk_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ClientArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = coachdesk_client::run_client(args).await {
        tracing::error!("Client error: {}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}
