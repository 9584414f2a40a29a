//! lobby-server
//!
//! Multi-session async TCP server for the table lobby.

pub mod config;
pub mod types;
pub mod server;

// these are internal modules, not re-exported
mod router;
mod session;
