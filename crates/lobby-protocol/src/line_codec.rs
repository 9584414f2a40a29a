// crates/lobby-protocol/src/line_codec.rs

//! Line codec.
//!
//! One message per line, comma-separated, tokens trimmed. Chat text is
//! the rest of the line after the table id, so it may contain commas.
//!
//! Input format (lines → `LobbyCommand`):
//!
//! - Identify:   `I, userId`
//! - Join:       `J, tableId`
//! - Spectate:   `S, tableId`
//! - Leave:      `L, tableId`
//! - Chat:       `M, tableId, text`
//! - My tables:  `T`
//!
//! Output format (`LobbyEvent` → line):
//!
//! - Welcome:     `W, userId`
//! - Joined:      `J, tableId, userId, role(P/S)`
//! - Left:        `L, tableId, userId, role(P/S)`
//! - TableClosed: `X, tableId`
//! - Chat:        `M, tableId, userId, text`
//! - Tables:      `T, userId, playing(a;b or -), spectating(a;b or -)`
//! - Rejected:    `E, reason`

use thiserror::Error;

use lobby_core::{LobbyCommand, LobbyEvent, TableId, UserId};

/// Why a client line could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("command {command} takes {expected} fields, got {got}")]
    WrongArity {
        command: char,
        expected: usize,
        got: usize,
    },

    #[error("`{0}` is not a valid id")]
    BadNumber(String),

    #[error("chat message is empty")]
    EmptyChat,
}

/// Parse a single line into a `LobbyCommand`.
///
/// Returns `Ok(None)` for blank lines or comments (starting with `#`).
pub fn parse_input_line(line: &str) -> Result<Option<LobbyCommand>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (tag, rest) = match trimmed.split_once(',') {
        Some((tag, rest)) => (tag.trim(), Some(rest)),
        None => (trimmed, None),
    };

    let cmd = match tag {
        "I" => LobbyCommand::Identify(UserId(parse_id(single_arg('I', rest)?)?)),
        "J" => LobbyCommand::Join(TableId(parse_id(single_arg('J', rest)?)?)),
        "S" => LobbyCommand::Spectate(TableId(parse_id(single_arg('S', rest)?)?)),
        "L" => LobbyCommand::Leave(TableId(parse_id(single_arg('L', rest)?)?)),
        "M" => parse_chat(rest)?,
        "T" => match rest {
            None => LobbyCommand::ListTables,
            Some(rest) => {
                return Err(ParseError::WrongArity {
                    command: 'T',
                    expected: 1,
                    got: 1 + split_and_trim(rest, ',').len(),
                })
            }
        },
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(Some(cmd))
}

fn parse_chat(rest: Option<&str>) -> Result<LobbyCommand, ParseError> {
    // M, table, text...
    let (table, text) = rest
        .and_then(|r| r.split_once(','))
        .ok_or(ParseError::WrongArity {
            command: 'M',
            expected: 3,
            got: if rest.is_some() { 2 } else { 1 },
        })?;

    let table = TableId(parse_id(table.trim())?);
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyChat);
    }

    Ok(LobbyCommand::Chat {
        table,
        text: text.to_string(),
    })
}

/// Format a `LobbyEvent` as a line (no trailing newline).
pub fn format_output_line(event: &LobbyEvent) -> String {
    match event {
        LobbyEvent::Welcome { user } => format!("W, {}", user),
        LobbyEvent::Joined { table, user, role } => {
            format!("J, {}, {}, {}", table, user, role.as_char())
        }
        LobbyEvent::Left { table, user, role } => {
            format!("L, {}, {}, {}", table, user, role.as_char())
        }
        LobbyEvent::TableClosed { table } => format!("X, {}", table),
        LobbyEvent::Chat { table, user, text } => format!("M, {}, {}, {}", table, user, text),
        LobbyEvent::Tables {
            user,
            playing,
            spectating,
        } => format!(
            "T, {}, {}, {}",
            user,
            format_table_list(playing),
            format_table_list(spectating)
        ),
        LobbyEvent::Rejected { reason } => format!("E, {}", reason),
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn single_arg(command: char, rest: Option<&str>) -> Result<&str, ParseError> {
    let tokens = rest.map(|r| split_and_trim(r, ',')).unwrap_or_default();
    if tokens.len() != 1 {
        return Err(ParseError::WrongArity {
            command,
            expected: 2,
            got: 1 + tokens.len(),
        });
    }
    Ok(tokens[0])
}

fn split_and_trim(s: &str, delimiter: char) -> Vec<&str> {
    s.split(delimiter).map(str::trim).collect()
}

fn parse_id<T: std::str::FromStr>(s: &str) -> Result<T, ParseError> {
    s.parse::<T>()
        .map_err(|_| ParseError::BadNumber(s.to_string()))
}

fn format_table_list(tables: &[TableId]) -> String {
    if tables.is_empty() {
        return "-".to_string();
    }
    tables
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobby_core::Role;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_input_line("   "), Ok(None));
        assert_eq!(parse_input_line("# join table 1"), Ok(None));
    }

    #[test]
    fn parses_table_commands() {
        assert_eq!(
            parse_input_line("I, 42"),
            Ok(Some(LobbyCommand::Identify(UserId(42))))
        );
        assert_eq!(
            parse_input_line("I, 4294967296"),
            Ok(Some(LobbyCommand::Identify(UserId(4_294_967_296))))
        );
        assert_eq!(
            parse_input_line(" J ,7 "),
            Ok(Some(LobbyCommand::Join(TableId(7))))
        );
        assert_eq!(
            parse_input_line("S, 18446744073709551615"),
            Ok(Some(LobbyCommand::Spectate(TableId(u64::MAX))))
        );
        assert_eq!(
            parse_input_line("L, 3"),
            Ok(Some(LobbyCommand::Leave(TableId(3))))
        );
        assert_eq!(parse_input_line("T"), Ok(Some(LobbyCommand::ListTables)));
    }

    #[test]
    fn chat_text_keeps_commas() {
        assert_eq!(
            parse_input_line("M, 5, hello, table 5"),
            Ok(Some(LobbyCommand::Chat {
                table: TableId(5),
                text: "hello, table 5".to_string(),
            }))
        );
        assert_eq!(parse_input_line("M, 5,   "), Err(ParseError::EmptyChat));
        assert!(matches!(
            parse_input_line("M, 5"),
            Err(ParseError::WrongArity { command: 'M', .. })
        ));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            parse_input_line("Z, 1"),
            Err(ParseError::UnknownCommand("Z".to_string()))
        );
        assert_eq!(
            parse_input_line("J, -4"),
            Err(ParseError::BadNumber("-4".to_string()))
        );
        assert_eq!(
            parse_input_line("J"),
            Err(ParseError::WrongArity {
                command: 'J',
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            parse_input_line("L, 1, 2"),
            Err(ParseError::WrongArity {
                command: 'L',
                expected: 2,
                got: 3
            })
        );
        assert!(matches!(
            parse_input_line("T, 1"),
            Err(ParseError::WrongArity { command: 'T', .. })
        ));
        assert!(matches!(
            parse_input_line("I, 18446744073709551616"),
            Err(ParseError::BadNumber(_))
        ));
    }

    #[test]
    fn formats_events() {
        assert_eq!(
            format_output_line(&LobbyEvent::Joined {
                table: TableId(3),
                user: UserId(1),
                role: Role::Spectator,
            }),
            "J, 3, 1, S"
        );
        assert_eq!(
            format_output_line(&LobbyEvent::TableClosed { table: TableId(3) }),
            "X, 3"
        );
        assert_eq!(
            format_output_line(&LobbyEvent::Tables {
                user: UserId(1),
                playing: vec![TableId(4), TableId(2)],
                spectating: vec![],
            }),
            "T, 1, 4;2, -"
        );
        assert_eq!(
            format_output_line(&LobbyEvent::rejected("table 9 does not exist")),
            "E, table 9 does not exist"
        );
    }
}
