//! Event routing.
//!
//! Every `Dispatch` produced by the table manager already carries its
//! audience, so routing is just a lookup of each recipient's outbound
//! channel. Recipients that are not (or no longer) connected are skipped.

use std::collections::HashMap;

use lobby_core::{Dispatch, UserId};
use tracing::debug;

use crate::types::{LobbyState, OutboundTx};

/// Deliver a batch of dispatches in order.
pub async fn deliver(state: &LobbyState, dispatches: Vec<Dispatch>) {
    if dispatches.is_empty() {
        return;
    }

    // Unbounded sends never wait, so the read guard is held only briefly.
    let sessions = state.sessions().read().await;
    for dispatch in &dispatches {
        route(dispatch, &sessions);
    }
}

/// Route a single `Dispatch` to each of its recipients.
fn route(dispatch: &Dispatch, sessions: &HashMap<UserId, OutboundTx>) {
    for user in &dispatch.recipients {
        match sessions.get(user) {
            Some(tx) => {
                let _ = tx.send(dispatch.event.clone());
            }
            None => debug!(
                user = user.0,
                table = ?dispatch.event.table(),
                "recipient not connected, dropping event"
            ),
        }
    }
}
