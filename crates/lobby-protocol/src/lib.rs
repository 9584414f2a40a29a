//! lobby-protocol
//!
//! Wire-level encoding/decoding for the lobby.
//!
//! This crate is responsible for turning logical lobby messages
//! (`lobby_core::LobbyCommand` / `LobbyEvent`) into text lines and
//! back again.
//!
//! - [`line_codec`] : comma-separated line protocol (netcat friendly)

pub mod line_codec;

pub use line_codec::{format_output_line, parse_input_line, ParseError};
