//! lobby-core
//!
//! Pure lobby logic:
//! - user / table identifiers
//! - user → tables membership registry
//! - per-table seats and spectators
//! - lobby-wide table manager
//! - messages (commands / events)

pub mod ids;
pub mod role;
pub mod membership;
pub mod table;
pub mod table_manager;
pub mod messages;
pub mod error;

pub use ids::{TableId, UserId};
pub use role::Role;

pub use messages::{Dispatch, LobbyCommand, LobbyEvent};

pub use membership::MembershipRegistry;
pub use table::Table;
pub use table_manager::{TableManager, DEFAULT_MAX_PLAYERS};
pub use error::LobbyError;
