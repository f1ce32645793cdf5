//! WebSocket handler: push notifications when desk state moves.
//!
//! DESIGN
//! ======
//! Each connection subscribes to both engine revision channels and enters a
//! `select!` loop:
//! - Simulator revision bump → send `desks:changed` with `source: simulator`
//! - Live revision bump → send `desks:changed` with `source: live`
//! - Client close (or any socket error) → exit
//!
//! The event carries no desk payload. Clients refetch the dashboard view,
//! which keeps selection and filters entirely on their side.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::AppState;

pub const DESKS_CHANGED: &str = "desks:changed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    Simulator,
    Live,
}

#[derive(Debug, Serialize)]
pub struct ChangeEvent {
    pub event: &'static str,
    pub source: ChangeSource,
    pub revision: u64,
}

enum Wake {
    Changed(ChangeSource, u64),
    Closed,
    Ignore,
}

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    // Fresh receivers treat the current revision as seen; only later
    // changes are pushed.
    let (mut sim_rx, mut live_rx) = state.subscribe();
    info!(
        sim_revision = state.simulator.revision(),
        live_revision = state.live.revision(),
        "ws: client connected"
    );

    loop {
        let wake = tokio::select! {
            changed = sim_rx.changed() => revision_wake(changed, &mut sim_rx, ChangeSource::Simulator),
            changed = live_rx.changed() => revision_wake(changed, &mut live_rx, ChangeSource::Live),
            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_)) | Err(_)) | None => Wake::Closed,
                Some(Ok(_)) => Wake::Ignore,
            },
        };

        match wake {
            Wake::Changed(source, revision) => {
                let event = ChangeEvent { event: DESKS_CHANGED, source, revision };
                let Ok(text) = serde_json::to_string(&event) else { continue };
                debug!(?source, revision, "ws: push desks:changed");
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            Wake::Ignore => {}
            Wake::Closed => break,
        }
    }
    info!("ws: client disconnected");
}

fn revision_wake(
    changed: Result<(), watch::error::RecvError>,
    rx: &mut watch::Receiver<u64>,
    source: ChangeSource,
) -> Wake {
    match changed {
        Ok(()) => Wake::Changed(source, *rx.borrow_and_update()),
        Err(_) => Wake::Closed,
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
