//! Command line / environment configuration for the client binary.

use std::path::PathBuf;

use clap::Parser;

/// Terminal front end for the coachdesk site.
#[derive(Debug, Clone, Parser)]
#[command(name = "coachdesk-client", version, about)]
pub struct ClientArgs {
    /// JSON site configuration injected by the hosting environment
    #[arg(long, env = "COACHDESK_HOST_CONFIG")]
    pub host_config: Option<PathBuf>,

    /// File keeping the session token between runs
    #[arg(long, env = "COACHDESK_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Use an in-process store instead of a server
    #[arg(long)]
    pub offline: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "COACHDESK_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}
