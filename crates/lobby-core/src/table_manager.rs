//! Lobby-wide table orchestrator.
//!
//! - Maintains one [`Table`] per table id, created on the first join.
//! - Mirrors every seat / spectator change into two
//!   [`MembershipRegistry`]s (`playing`, `spectating`).
//! - Computes the audience of every event while the change is applied,
//!   so routing never has to re-read table state.
//!
//! Locking: the tables map is locked first, then (inside it) a registry.
//! Read-only authorization (`can_observe`) touches only the registries.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::LobbyError;
use crate::ids::{TableId, UserId};
use crate::membership::MembershipRegistry;
use crate::messages::{Dispatch, LobbyEvent};
use crate::role::Role;
use crate::table::Table;

/// Largest Hanabi table.
pub const DEFAULT_MAX_PLAYERS: usize = 6;

/// Owns every open table and both membership indices.
#[derive(Debug)]
pub struct TableManager {
    /// TableId -> Table.
    tables: Mutex<HashMap<TableId, Table>>,

    /// Tables each user is seated at.
    playing: MembershipRegistry,

    /// Tables each user is watching.
    spectating: MembershipRegistry,

    max_players: usize,
}

impl Default for TableManager {
    fn default() -> Self {
        TableManager::new(DEFAULT_MAX_PLAYERS)
    }
}

impl TableManager {
    /// Create an empty lobby whose tables seat at most `max_players`
    /// (clamped to at least one, the owner).
    pub fn new(max_players: usize) -> Self {
        TableManager {
            tables: Mutex::new(HashMap::new()),
            playing: MembershipRegistry::new(),
            spectating: MembershipRegistry::new(),
            max_players: max_players.max(1),
        }
    }

    /// Seat `user` at `table_id`, opening the table if needed.
    ///
    /// Emits `Joined` (as player) to every member, the joiner included.
    pub fn join(&self, user: UserId, table_id: TableId) -> Result<Vec<Dispatch>, LobbyError> {
        let mut tables = self.lock_tables();

        let table = match tables.entry(table_id) {
            Entry::Occupied(entry) => {
                let table = entry.into_mut();
                table.seat(user)?;
                table
            }
            Entry::Vacant(entry) => entry.insert(Table::new(table_id, user, self.max_players)),
        };
        self.playing.add(user, table_id);

        Ok(vec![Dispatch::new(
            table.members(),
            LobbyEvent::Joined {
                table: table_id,
                user,
                role: Role::Player,
            },
        )])
    }

    /// Start watching an existing table.
    pub fn spectate(&self, user: UserId, table_id: TableId) -> Result<Vec<Dispatch>, LobbyError> {
        let mut tables = self.lock_tables();

        let table = tables
            .get_mut(&table_id)
            .ok_or(LobbyError::TableNotFound(table_id))?;
        table.add_spectator(user)?;
        self.spectating.add(user, table_id);

        Ok(vec![Dispatch::new(
            table.members(),
            LobbyEvent::Joined {
                table: table_id,
                user,
                role: Role::Spectator,
            },
        )])
    }

    /// Leave `table_id` in whatever role `user` holds there.
    ///
    /// When the last player leaves, the table closes and its spectators
    /// are removed along with it.
    pub fn leave(&self, user: UserId, table_id: TableId) -> Result<Vec<Dispatch>, LobbyError> {
        let mut tables = self.lock_tables();
        self.leave_locked(&mut tables, user, table_id)
    }

    /// Remove `user` from every table they occupy.
    ///
    /// Runs under a single hold of the tables lock, so no join can slip in
    /// between the snapshot and the removals. Afterwards neither registry
    /// holds the user.
    pub fn disconnect(&self, user: UserId) -> Vec<Dispatch> {
        let mut tables = self.lock_tables();

        let playing = self.playing.tables_of(user);
        let spectating = self.spectating.tables_of(user);

        let mut outputs = Vec::new();
        for table_id in playing.into_iter().chain(spectating) {
            match self.leave_locked(&mut tables, user, table_id) {
                Ok(dispatches) => outputs.extend(dispatches),
                Err(_) => {
                    // No table behind this membership: drop the entry anyway.
                    self.playing.remove(user, table_id);
                    self.spectating.remove(user, table_id);
                }
            }
        }
        outputs
    }

    /// Broadcast a chat line from `user` to everyone at `table_id`.
    pub fn chat(
        &self,
        user: UserId,
        table_id: TableId,
        text: String,
    ) -> Result<Dispatch, LobbyError> {
        if !self.can_observe(user, table_id) {
            return Err(LobbyError::NotAtTable {
                user,
                table: table_id,
            });
        }

        Ok(Dispatch::new(
            self.members(table_id),
            LobbyEvent::Chat {
                table: table_id,
                user,
                text,
            },
        ))
    }

    /// Whether `user` may see table-scoped traffic for `table_id`.
    pub fn can_observe(&self, user: UserId, table_id: TableId) -> bool {
        self.playing.contains(user, table_id) || self.spectating.contains(user, table_id)
    }

    /// `Tables` snapshot for `user`.
    pub fn tables_of(&self, user: UserId) -> LobbyEvent {
        LobbyEvent::Tables {
            user,
            playing: self.playing.tables_of(user),
            spectating: self.spectating.tables_of(user),
        }
    }

    /// Current members of `table_id` (empty if it does not exist).
    pub fn members(&self, table_id: TableId) -> Vec<UserId> {
        self.lock_tables()
            .get(&table_id)
            .map(Table::members)
            .unwrap_or_default()
    }

    /// For tests or admin queries: snapshot of a table.
    pub fn table(&self, table_id: TableId) -> Option<Table> {
        self.lock_tables().get(&table_id).cloned()
    }

    /// For tests or admin queries: number of open tables.
    pub fn num_tables(&self) -> usize {
        self.lock_tables().len()
    }

    /// User → tables index for seated players.
    pub fn playing(&self) -> &MembershipRegistry {
        &self.playing
    }

    /// User → tables index for spectators.
    pub fn spectating(&self) -> &MembershipRegistry {
        &self.spectating
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn leave_locked(
        &self,
        tables: &mut HashMap<TableId, Table>,
        user: UserId,
        table_id: TableId,
    ) -> Result<Vec<Dispatch>, LobbyError> {
        let table = tables
            .get_mut(&table_id)
            .ok_or(LobbyError::TableNotFound(table_id))?;

        let role = if table.unseat(user) {
            self.playing.remove(user, table_id);
            Role::Player
        } else if table.remove_spectator(user) {
            self.spectating.remove(user, table_id);
            Role::Spectator
        } else {
            return Err(LobbyError::NotAtTable {
                user,
                table: table_id,
            });
        };

        // The leaver hears their own departure too.
        let mut audience = table.members();
        audience.push(user);

        let mut outputs = vec![Dispatch::new(
            audience,
            LobbyEvent::Left {
                table: table_id,
                user,
                role,
            },
        )];

        if table.is_abandoned() {
            if let Some(closed) = tables.remove(&table_id) {
                for spectator in &closed.spectators {
                    self.spectating.remove(*spectator, table_id);
                }
                let mut audience = closed.spectators;
                audience.push(user);
                outputs.push(Dispatch::new(
                    audience,
                    LobbyEvent::TableClosed { table: table_id },
                ));
            }
        }

        Ok(outputs)
    }

    // Every table mutation is a single push/remove; a poisoned lock still
    // guards consistent tables.
    fn lock_tables(&self) -> MutexGuard<'_, HashMap<TableId, Table>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
