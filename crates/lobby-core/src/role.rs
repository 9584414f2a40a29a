//! Role (Player / Spectator) a user holds at a table.

/// How a user occupies a table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Player,
    Spectator,
}

impl Role {
    /// Single-char wire representation (`'P'` / `'S'`).
    pub fn as_char(self) -> char {
        match self {
            Role::Player => 'P',
            Role::Spectator => 'S',
        }
    }
}
