// crates/lobby-server/src/session.rs

//! Per-connection session task.
//!
//! A session reads newline-terminated commands, applies them to the shared
//! `TableManager` directly from this task, and routes the resulting events.
//! A separate writer task drains the session's outbound channel.
//!
//! The first command must be `Identify`. When the connection ends, every
//! membership of the identified user is torn down before the user is
//! unregistered.

use anyhow::Result;
use bytes::BytesMut;
use lobby_core::{Dispatch, LobbyCommand, LobbyEvent, UserId};
use lobby_protocol::{format_output_line, parse_input_line};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::router;
use crate::types::{ClientId, LobbyState, OutboundRx, OutboundTx};

/// Longest line accepted; longer lines are rejected and skipped.
const MAX_LINE_LEN: usize = 4096;

/// Run the I/O loop for a single connection until it closes.
pub async fn run_session(client_id: ClientId, stream: TcpStream, state: &LobbyState) -> Result<()> {
    let (read_stream, write_stream) = stream.into_split();

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(run_writer(client_id, write_stream, out_rx));

    let mut session = Session {
        client_id,
        user: None,
        out_tx,
    };
    let result = session.read_loop(read_stream, state).await;

    if let Some(user) = session.user {
        let dispatches = state.tables.disconnect(user);
        info!(
            client = client_id.0,
            user = user.0,
            tables_left = dispatches
                .iter()
                .filter(|d| matches!(d.event, LobbyEvent::Left { .. }))
                .count(),
            "user disconnected"
        );
        router::deliver(state, dispatches).await;
        state.unregister(user).await;
    }

    // Dropping the last sender lets the writer drain and exit.
    drop(session);
    let _ = writer.await;

    result
}

struct Session {
    client_id: ClientId,
    user: Option<UserId>,
    out_tx: OutboundTx,
}

impl Session {
    async fn read_loop(
        &mut self,
        mut read_stream: OwnedReadHalf,
        state: &LobbyState,
    ) -> Result<()> {
        let mut buffer = BytesMut::with_capacity(1024);
        // Set while skipping the tail of an over-long line.
        let mut discarding = false;

        loop {
            let n = read_stream.read_buf(&mut buffer).await?;
            if n == 0 {
                // EOF
                return Ok(());
            }

            // Process complete lines
            while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                let line = buffer.split_to(newline_pos + 1);
                if discarding {
                    discarding = false;
                    continue;
                }
                if newline_pos > MAX_LINE_LEN {
                    self.reject_long_line();
                    continue;
                }
                let line = String::from_utf8_lossy(&line);
                self.handle_line(state, &line).await;
            }

            // No newline yet and already too long: drop what we have and
            // skip up to the next newline.
            if buffer.len() > MAX_LINE_LEN {
                if !discarding {
                    self.reject_long_line();
                    discarding = true;
                }
                buffer.clear();
            }
        }
    }

    fn reject_long_line(&self) {
        warn!(client = self.client_id.0, max = MAX_LINE_LEN, "line too long, discarded");
        self.reply(LobbyEvent::rejected("line too long"));
    }

    async fn handle_line(&mut self, state: &LobbyState, line: &str) {
        match parse_input_line(line) {
            Ok(Some(cmd)) => self.handle_command(state, cmd).await,
            Ok(None) => {}
            Err(err) => {
                debug!(client = self.client_id.0, line = line.trim(), %err, "invalid line");
                self.reply(LobbyEvent::rejected(err.to_string()));
            }
        }
    }

    async fn handle_command(&mut self, state: &LobbyState, cmd: LobbyCommand) {
        let user = match (&cmd, self.user) {
            (LobbyCommand::Identify(user), None) => return self.identify(state, *user).await,
            (LobbyCommand::Identify(_), Some(current)) => {
                return self.reply(LobbyEvent::rejected(format!(
                    "session already identified as user {}",
                    current
                )))
            }
            (_, None) => return self.reply(LobbyEvent::rejected("identify first")),
            (_, Some(user)) => user,
        };

        debug!(client = self.client_id.0, user = user.0, ?cmd, "command");

        let tables = &state.tables;
        let result = match cmd {
            LobbyCommand::Identify(_) => Ok(Vec::new()),
            LobbyCommand::Join(table) => tables.join(user, table),
            LobbyCommand::Spectate(table) => tables.spectate(user, table),
            LobbyCommand::Leave(table) => tables.leave(user, table),
            LobbyCommand::Chat { table, text } => tables.chat(user, table, text).map(|d| vec![d]),
            LobbyCommand::ListTables => Ok(vec![Dispatch::unicast(user, tables.tables_of(user))]),
        };

        match result {
            Ok(dispatches) => router::deliver(state, dispatches).await,
            Err(err) => {
                debug!(client = self.client_id.0, user = user.0, %err, "command rejected");
                self.reply(LobbyEvent::rejected(err.to_string()));
            }
        }
    }

    async fn identify(&mut self, state: &LobbyState, user: UserId) {
        if state.register(user, self.out_tx.clone()).await {
            self.user = Some(user);
            info!(client = self.client_id.0, user = user.0, "user identified");
            self.reply(LobbyEvent::Welcome { user });
        } else {
            warn!(client = self.client_id.0, user = user.0, "user already connected");
            self.reply(LobbyEvent::rejected(format!("user {} is already connected", user)));
        }
    }

    /// Unicast straight to this session, bypassing the router.
    fn reply(&self, event: LobbyEvent) {
        let _ = self.out_tx.send(event);
    }
}

async fn run_writer(client_id: ClientId, mut write_stream: OwnedWriteHalf, mut out_rx: OutboundRx) {
    while let Some(event) = out_rx.recv().await {
        let line = format!("{}\n", format_output_line(&event));
        if let Err(e) = write_stream.write_all(line.as_bytes()).await {
            debug!(client = client_id.0, error = %e, "write failed, closing writer");
            break;
        }
    }
    let _ = write_stream.shutdown().await;
}
