//! Liveness endpoint for uptime pings.  Always answers 200; it does not
//! reflect poll-loop health.

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

pub const ALIVE_TEXT: &str = "OTP Bot is alive!";

async fn home() -> &'static str {
    ALIVE_TEXT
}

pub fn router() -> Router {
    Router::new().route("/", get(home))
}

/// Serve the liveness router on `0.0.0.0:port` until the process exits.
pub async fn serve(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind liveness server on {addr}"))?;
    info!("Liveness server listening on {addr}");
    axum::serve(listener, router())
        .await
        .context("liveness server failed")
}
