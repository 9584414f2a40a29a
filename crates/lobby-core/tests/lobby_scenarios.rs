// crates/lobby-core/tests/lobby_scenarios.rs
use lobby_core::{Dispatch, LobbyCommand, LobbyEvent, TableManager, UserId};
use lobby_protocol::line_codec::{format_output_line, parse_input_line};

/// Each line is `<user>> <command>`; output is one `<recipient>: <event>`
/// line per delivered event.
const SCRIPT: &str = "\
#name: open and fill a table
1> J, 100
2> J, 100
3> S, 100
2> M, 100, hello, all
1> T
#name: owner leaves, then the last player
1> L, 100
2> L, 100
3> T
#name: rejections
4> S, 100
4> L, 7
4> J, 100, 3
";

const EXPECTED: &str = "\
1: J, 100, 1, P
1: J, 100, 2, P
2: J, 100, 2, P
1: J, 100, 3, S
2: J, 100, 3, S
3: J, 100, 3, S
1: M, 100, 2, hello, all
2: M, 100, 2, hello, all
3: M, 100, 2, hello, all
1: T, 1, 100, -
2: L, 100, 1, P
3: L, 100, 1, P
1: L, 100, 1, P
3: L, 100, 2, P
2: L, 100, 2, P
3: X, 100
2: X, 100
3: T, 3, -, -
4: E, table 100 does not exist
4: E, table 7 does not exist
4: E, command J takes 2 fields, got 3";

fn run_command(lobby: &TableManager, user: UserId, cmd: LobbyCommand) -> Vec<Dispatch> {
    let result = match cmd {
        LobbyCommand::Identify(_) => Ok(Vec::new()),
        LobbyCommand::Join(table) => lobby.join(user, table),
        LobbyCommand::Spectate(table) => lobby.spectate(user, table),
        LobbyCommand::Leave(table) => lobby.leave(user, table),
        LobbyCommand::Chat { table, text } => lobby.chat(user, table, text).map(|d| vec![d]),
        LobbyCommand::ListTables => Ok(vec![Dispatch::unicast(user, lobby.tables_of(user))]),
    };

    result.unwrap_or_else(|err| {
        vec![Dispatch::unicast(user, LobbyEvent::rejected(err.to_string()))]
    })
}

fn run_script(script: &str) -> Vec<String> {
    let lobby = TableManager::new(6);
    let mut lines = Vec::new();

    for raw in script.lines() {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }

        let (user, command) = raw.split_once('>').expect("script line needs `user>`");
        let user = UserId(user.trim().parse().expect("script user id"));

        let dispatches = match parse_input_line(command) {
            Ok(Some(cmd)) => run_command(&lobby, user, cmd),
            Ok(None) => continue,
            Err(err) => vec![Dispatch::unicast(user, LobbyEvent::rejected(err.to_string()))],
        };

        for dispatch in dispatches {
            for recipient in &dispatch.recipients {
                lines.push(format!("{}: {}", recipient, format_output_line(&dispatch.event)));
            }
        }
    }

    lines
}

#[test]
fn script_matches_reference_output() {
    let actual = run_script(SCRIPT);
    let expected: Vec<&str> = EXPECTED.lines().collect();

    assert_eq!(actual, expected);
}

#[test]
fn every_scenario_ends_with_clean_indices() {
    let lobby = TableManager::new(6);
    for user in 1..=4u64 {
        let _ = lobby.join(UserId(user), lobby_core::TableId(user % 2));
    }
    for user in 1..=4u64 {
        lobby.disconnect(UserId(user));
    }

    assert_eq!(lobby.num_tables(), 0);
    assert!(lobby.playing().is_empty());
    assert!(lobby.spectating().is_empty());
}
