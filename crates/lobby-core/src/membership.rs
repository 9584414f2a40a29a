//! User → tables membership registry.
//!
//! Tracks, for every user, the tables they currently occupy in join order.
//! The registry is shared by every session task, so all state sits behind a
//! single `RwLock` that is held for exactly one operation at a time.
//!
//! Invariants:
//! - a user is a key iff their table list is non-empty,
//! - a table appears at most once in a user's list,
//! - list order is join order.
//!
//! The inverse relation (table → members) lives in [`crate::TableManager`];
//! keeping the two consistent is the caller's job.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ids::{TableId, UserId};

/// Concurrency-safe index from user to the ordered tables they occupy.
///
/// Every operation is total: unknown users and absent pairs are ordinary
/// "no membership" states, never errors.
#[derive(Debug, Default)]
pub struct MembershipRegistry {
    user_tables: RwLock<HashMap<UserId, Vec<TableId>>>,
}

impl MembershipRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        MembershipRegistry::default()
    }

    /// Record that `user` occupies `table`.
    ///
    /// Appends to the end of the user's list; a pair that is already present
    /// is left where it is.
    pub fn add(&self, user: UserId, table: TableId) {
        let mut map = self.write();
        let tables = map.entry(user).or_default();
        if !tables.contains(&table) {
            tables.push(table);
        }
    }

    /// Forget that `user` occupies `table`.
    ///
    /// Remaining tables keep their relative order. The user's entry is
    /// dropped as soon as their list becomes empty.
    pub fn remove(&self, user: UserId, table: TableId) {
        let mut map = self.write();

        let Some(tables) = map.get_mut(&user) else {
            return;
        };

        if let Some(pos) = tables.iter().position(|t| *t == table) {
            tables.remove(pos);
        }

        if tables.is_empty() {
            map.remove(&user);
        }
    }

    /// Snapshot of the tables `user` occupies, in join order.
    ///
    /// Empty for a user with no memberships.
    pub fn tables_of(&self, user: UserId) -> Vec<TableId> {
        self.read().get(&user).cloned().unwrap_or_default()
    }

    /// Whether `user` currently occupies `table`.
    pub fn contains(&self, user: UserId, table: TableId) -> bool {
        self.read()
            .get(&user)
            .is_some_and(|tables| tables.contains(&table))
    }

    /// Number of users with at least one membership.
    pub fn num_users(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic can never leave the map half-updated (each mutation is a
    // single push/remove), so a poisoned lock still guards a valid map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<UserId, Vec<TableId>>> {
        self.user_tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<UserId, Vec<TableId>>> {
        self.user_tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
