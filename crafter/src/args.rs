use std::path::PathBuf;

use clap::Parser;

/// Centralized error responses for HTTP and hub APIs
#[derive(Debug, Parser)]
#[command(name = "crafter", about = "Demo service answering every failure with a uniform error payload")]
pub struct Args {
    /// Path to configuration file, built-in defaults when omitted
    #[arg(short, long, env = "CRAFTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "CRAFTER_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Override error visibility (`Public` or `Private`)
    #[arg(long, env = "RESPONSE_CRAFTER_VISIBILITY")]
    pub visibility: Option<String>,

    /// Log filter directive
    #[arg(long, default_value = "info", env = "CRAFTER_LOG")]
    pub log: String,
}
