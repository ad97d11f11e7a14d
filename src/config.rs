//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

/// In-memory user record service.
#[derive(Debug, Parser)]
#[command(name = "userdb", version, about)]
pub struct Config {
    /// Socket address to listen on.
    #[arg(long, env = "USERDB_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,

    /// Log filter directive (e.g. `debug`, `userdb=trace`). Overrides RUST_LOG.
    #[arg(long, env = "USERDB_LOG")]
    pub log: Option<String>,
}
