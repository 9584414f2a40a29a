//! A single game table and who is sitting at / watching it.
//!
//! This is the inverse side of the membership registry: the table knows
//! its members, the registry knows each member's tables.

use crate::error::LobbyError;
use crate::ids::{TableId, UserId};
use crate::role::Role;

/// One table in the lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table identifier.
    pub id: TableId,

    /// Current owner; always one of `players` while the table is open.
    pub owner: UserId,

    /// Seated players, in join order.
    pub players: Vec<UserId>,

    /// Spectators, in join order.
    pub spectators: Vec<UserId>,

    /// Seat limit for `players`. Spectators are unbounded.
    pub max_players: usize,
}

impl Table {
    /// Create a table with `owner` already seated.
    pub fn new(id: TableId, owner: UserId, max_players: usize) -> Self {
        Table {
            id,
            owner,
            players: vec![owner],
            spectators: Vec::new(),
            max_players,
        }
    }

    /// Seat `user` as a player.
    pub fn seat(&mut self, user: UserId) -> Result<(), LobbyError> {
        self.ensure_absent(user)?;
        if self.players.len() >= self.max_players {
            return Err(LobbyError::TableFull {
                table: self.id,
                max_players: self.max_players,
            });
        }
        self.players.push(user);
        Ok(())
    }

    /// Remove `user` from the seats. Returns whether they were seated.
    ///
    /// If the owner leaves, ownership passes to the longest-seated player.
    pub fn unseat(&mut self, user: UserId) -> bool {
        let Some(pos) = self.players.iter().position(|p| *p == user) else {
            return false;
        };
        self.players.remove(pos);

        if self.owner == user {
            if let Some(next) = self.players.first() {
                self.owner = *next;
            }
        }
        true
    }

    /// Add `user` as a spectator.
    pub fn add_spectator(&mut self, user: UserId) -> Result<(), LobbyError> {
        self.ensure_absent(user)?;
        self.spectators.push(user);
        Ok(())
    }

    /// Remove `user` from the spectators. Returns whether they were watching.
    pub fn remove_spectator(&mut self, user: UserId) -> bool {
        match self.spectators.iter().position(|s| *s == user) {
            Some(pos) => {
                self.spectators.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Role `user` holds here, if any.
    pub fn role_of(&self, user: UserId) -> Option<Role> {
        if self.players.contains(&user) {
            Some(Role::Player)
        } else if self.spectators.contains(&user) {
            Some(Role::Spectator)
        } else {
            None
        }
    }

    /// Everyone who should hear table-scoped events: players, then spectators.
    pub fn members(&self) -> Vec<UserId> {
        self.players
            .iter()
            .chain(self.spectators.iter())
            .copied()
            .collect()
    }

    /// A table with no players left is closed, even if spectators remain.
    pub fn is_abandoned(&self) -> bool {
        self.players.is_empty()
    }

    fn ensure_absent(&self, user: UserId) -> Result<(), LobbyError> {
        if self.role_of(user).is_some() {
            return Err(LobbyError::AlreadyAtTable {
                user,
                table: self.id,
            });
        }
        Ok(())
    }
}
