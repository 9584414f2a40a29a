//! Shared types for the lobby TCP server.
//!
//! This module defines:
//! - `ClientId`: a lightweight handle for connections
//! - channel aliases from the router to each session's writer
//! - `LobbyState`: everything session tasks share

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lobby_core::{LobbyEvent, TableManager, UserId};
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Identifier for a TCP connection.
///
/// Unique over the lifetime of the process; distinct from the `UserId`
/// the connection later identifies as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

/// Outbound events to a given session.
pub type OutboundTx = mpsc::UnboundedSender<LobbyEvent>;
pub type OutboundRx = mpsc::UnboundedReceiver<LobbyEvent>;

/// State shared by every session task.
#[derive(Debug)]
pub struct LobbyState {
    /// Tables and the user → tables indices.
    pub tables: TableManager,

    /// Identified users and their outbound channels.
    sessions: RwLock<HashMap<UserId, OutboundTx>>,

    /// Open connections, identified or not.
    connections: AtomicUsize,
}

pub type SharedState = Arc<LobbyState>;

impl LobbyState {
    pub fn new(max_players: usize) -> Self {
        LobbyState {
            tables: TableManager::new(max_players),
            sessions: RwLock::new(HashMap::new()),
            connections: AtomicUsize::new(0),
        }
    }

    /// Bind `user` to an outbound channel. Fails if the user is already
    /// connected on another session.
    pub async fn register(&self, user: UserId, tx: OutboundTx) -> bool {
        let mut guard = self.sessions.write().await;
        if guard.contains_key(&user) {
            return false;
        }
        guard.insert(user, tx);
        true
    }

    pub async fn unregister(&self, user: UserId) {
        self.sessions.write().await.remove(&user);
    }

    pub async fn is_connected(&self, user: UserId) -> bool {
        self.sessions.read().await.contains_key(&user)
    }

    pub(crate) fn sessions(&self) -> &RwLock<HashMap<UserId, OutboundTx>> {
        &self.sessions
    }

    pub fn num_connections(&self) -> usize {
        self.connections.load(Ordering::Acquire)
    }

    pub(crate) fn connection_opened(&self) {
        self.connections.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn connection_closed(&self) {
        self.connections.fetch_sub(1, Ordering::AcqRel);
    }
}
