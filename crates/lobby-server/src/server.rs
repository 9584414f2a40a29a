//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections, up to `max_clients` at a time.
//! - Assigns each connection a `ClientId`.
//! - Spawns a session task per connection; sessions share one
//!   `LobbyState` and call into it directly.
//!
//! The per-session logic lives in the `session` module.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::session;
use crate::types::{ClientId, LobbyState, SharedState};

/// Counter for assigning unique `ClientId`s.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    ClientId(id)
}

/// Run the TCP server with the given configuration until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "listening");

    let state: SharedState = Arc::new(LobbyState::new(config.max_players));

    tokio::select! {
        res = serve(listener, state, config.max_clients) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
            Ok(())
        }
    }
}

/// Accept loop over an already-bound listener.
pub async fn serve(listener: TcpListener, state: SharedState, max_clients: usize) -> Result<()> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;

        if state.num_connections() >= max_clients {
            warn!(%peer_addr, max_clients, "rejecting connection: max_clients reached");
            // Just drop the stream; client will see the connection closed.
            continue;
        }

        let client_id = next_client_id();
        let guard = ConnectionGuard::open(state.clone());
        info!(client = client_id.0, %peer_addr, "accepted connection");

        tokio::spawn(async move {
            let state = &guard.state;
            match session::run_session(client_id, stream, state).await {
                Ok(()) => info!(client = client_id.0, "connection closed"),
                Err(e) => warn!(client = client_id.0, error = %e, "connection error"),
            }
        });
    }
}

/// Counts a connection for as long as its session task holds it.
struct ConnectionGuard {
    state: SharedState,
}

impl ConnectionGuard {
    fn open(state: SharedState) -> Self {
        state.connection_opened();
        ConnectionGuard { state }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.state.connection_closed();
    }
}
