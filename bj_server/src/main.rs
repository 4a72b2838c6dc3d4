//! Blackjack web server.
//!
//! Serves stateful blackjack sessions over a JSON HTTP API. Round state is
//! persisted per session between requests; the engine itself lives in the
//! `blackjack` crate.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use bj_server::api::{self, sessions::SessionStore};
use bj_server::config::ServerConfig;
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Run a blackjack web server

USAGE:
  bj_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address    [default: env SERVER_BIND or 127.0.0.1:3000]
  --max-sessions  N        Concurrent session limit      [default: env MAX_SESSIONS or 1024]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  MAX_SESSIONS             Concurrent session limit
  RUST_LOG                 Log level filter (e.g., info, debug)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let max_sessions_override: Option<usize> = pargs.opt_value_from_str("--max-sessions")?;

    env_logger::builder().format_target(false).init();

    let config = ServerConfig::from_env(bind_override, max_sessions_override)?;
    config.validate()?;

    let state = api::AppState {
        sessions: Arc::new(SessionStore::new(config.max_sessions)),
    };
    let app = api::create_router(state);

    info!("Starting blackjack server at {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install CTRL+C signal handler: {e}");
    }
}
