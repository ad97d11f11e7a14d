//! userdb binary: configuration, logging and wiring.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use userdb::config::Config;
use userdb::{Server, UserStore, api};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let filter = match &config.log {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = Arc::new(UserStore::new());
    let app = api::routes(store);

    Server::bind(config.addr)
        .await
        .with_context(|| format!("cannot listen on {}", config.addr))?
        .serve(app)
        .await
        .context("server error")
}
