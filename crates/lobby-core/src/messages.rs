//! Message types used by the lobby core.
//!
//! These are **transport-agnostic** logical messages:
//! - [`LobbyCommand`]: what a session asks the lobby to do.
//! - [`LobbyEvent`]: what the lobby tells sessions.
//! - [`Dispatch`]: an event paired with the users who must receive it.
//!
//! Note: the line codec lives in the `lobby-protocol` crate;
//! this module is purely logical.

use crate::ids::{TableId, UserId};
use crate::role::Role;

/// A request coming from one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyCommand {
    /// Bind the session to a user. Must come first.
    Identify(UserId),

    /// Take a seat at a table, creating it if it does not exist yet.
    Join(TableId),

    /// Watch an existing table.
    Spectate(TableId),

    /// Leave a table in whatever role the user holds there.
    Leave(TableId),

    /// Send a chat line to everyone at a table.
    Chat { table: TableId, text: String },

    /// Ask which tables the session's user occupies.
    ListTables,
}

/// An event produced by the lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyEvent {
    /// Session successfully identified.
    Welcome { user: UserId },

    /// `user` joined `table` as `role`.
    Joined {
        table: TableId,
        user: UserId,
        role: Role,
    },

    /// `user` left `table`, where they were `role`.
    Left {
        table: TableId,
        user: UserId,
        role: Role,
    },

    /// The last player left; the table no longer exists.
    TableClosed { table: TableId },

    /// Chat line from `user` at `table`.
    Chat {
        table: TableId,
        user: UserId,
        text: String,
    },

    /// Snapshot of a user's memberships, each in join order.
    Tables {
        user: UserId,
        playing: Vec<TableId>,
        spectating: Vec<TableId>,
    },

    /// A command was refused; `reason` is human readable.
    Rejected { reason: String },
}

impl LobbyEvent {
    pub fn rejected(reason: impl Into<String>) -> Self {
        LobbyEvent::Rejected {
            reason: reason.into(),
        }
    }

    /// Table the event is scoped to, if any.
    pub fn table(&self) -> Option<TableId> {
        match self {
            LobbyEvent::Joined { table, .. }
            | LobbyEvent::Left { table, .. }
            | LobbyEvent::TableClosed { table }
            | LobbyEvent::Chat { table, .. } => Some(*table),
            LobbyEvent::Welcome { .. }
            | LobbyEvent::Tables { .. }
            | LobbyEvent::Rejected { .. } => None,
        }
    }
}

/// An event and its audience, computed at the moment the event happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub recipients: Vec<UserId>,
    pub event: LobbyEvent,
}

impl Dispatch {
    pub fn new(recipients: Vec<UserId>, event: LobbyEvent) -> Self {
        Dispatch { recipients, event }
    }

    /// Event addressed to a single user.
    pub fn unicast(user: UserId, event: LobbyEvent) -> Self {
        Dispatch {
            recipients: vec![user],
            event,
        }
    }
}
