//! Error types for table lifecycle operations.
//!
//! The membership registry itself is infallible; these errors come from
//! the table manager and are surfaced to clients as rejection reasons.

use thiserror::Error;

use crate::ids::{TableId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    /// The requested table does not exist.
    #[error("table {0} does not exist")]
    TableNotFound(TableId),

    /// Every seat at the table is taken.
    #[error("table {table} is full ({max_players} players)")]
    TableFull { table: TableId, max_players: usize },

    /// The user already occupies the table, as player or spectator.
    #[error("user {user} is already at table {table}")]
    AlreadyAtTable { user: UserId, table: TableId },

    /// The user does not occupy the table.
    #[error("user {user} is not at table {table}")]
    NotAtTable { user: UserId, table: TableId },
}
