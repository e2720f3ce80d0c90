//! WebSocket handler — the room session coordinator.
//!
//! DESIGN
//! ======
//! On upgrade, generates a connection id and enters a `select!` loop:
//! - Incoming client events → parse + dispatch by event kind
//! - Broadcast events from room peers → forward to the client
//!
//! Dispatch owns all broadcast policy. Room-wide events (member list,
//! committed ops, snapshots) go to every member through their per-connection
//! channels while the room lock is held, so all members observe one total
//! order of state transitions. Ephemeral relays (cursor, live strokes)
//! exclude the sender, who already renders locally.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → connection is unjoined; only `join` is meaningful
//! 2. `join` → resolve + cache the room, reply `joined`, refresh the room
//! 3. Joined events → mutate room state, broadcast per event kind
//! 4. Close → remove membership, broadcast `users:update` + `user:left`
//!
//! Events that are invalid for the connection state are dropped without a
//! reply; a well-behaved client never sends them, and one connection's
//! garbage must never disturb the room.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::protocol::{ClientEvent, Point, ServerEvent};
use crate::services::rooms::Room;
use crate::state::AppState;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
enum JoinError {
    #[error("Room ID is required to join.")]
    EmptyRoomId,
}

/// Room binding resolved once at join time and held for the connection
/// lifetime, so no event after `join` ever touches the registry.
struct JoinedRoom {
    room_id: String,
    room: Arc<Mutex<Room>>,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let user_id = Uuid::new_v4();

    // Per-connection channel for receiving broadcast events from peers.
    let (client_tx, mut client_rx) = mpsc::channel::<ServerEvent>(256);

    info!(%user_id, "ws: client connected");

    let mut joined: Option<JoinedRoom> = None;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let replies =
                            process_client_text(&state, &mut joined, user_id, &client_tx, &text).await;
                        let mut send_failed = false;
                        for event in replies {
                            if send_event(&mut socket, &event).await.is_err() {
                                send_failed = true;
                                break;
                            }
                        }
                        if send_failed {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(event) = client_rx.recv() => {
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    if let Some(binding) = joined {
        leave_room(&binding, user_id).await;
    }
    info!(%user_id, "ws: client disconnected");
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Parse one inbound text message and process it. Returns events for the
/// sender; room-wide effects are delivered through peer channels.
async fn process_client_text(
    state: &AppState,
    joined: &mut Option<JoinedRoom>,
    user_id: Uuid,
    client_tx: &mpsc::Sender<ServerEvent>,
    text: &str,
) -> Vec<ServerEvent> {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(%user_id, error = %e, "ws: invalid inbound event");
            return vec![ServerEvent::Error { message: format!("invalid event: {e}") }];
        }
    };
    process_client_event(state, joined, user_id, client_tx, event).await
}

/// Apply one client event against the connection's state machine.
///
/// Kept free of socket concerns so tests can drive the whole coordinator
/// through plain channels.
async fn process_client_event(
    state: &AppState,
    joined: &mut Option<JoinedRoom>,
    user_id: Uuid,
    client_tx: &mpsc::Sender<ServerEvent>,
    event: ClientEvent,
) -> Vec<ServerEvent> {
    match event {
        ClientEvent::Join { room_id, username } => {
            handle_join(state, joined, user_id, client_tx, &room_id, &username).await
        }
        ClientEvent::Cursor { x, y } => {
            if let Some(binding) = joined_room(joined.as_ref(), user_id) {
                let room = binding.room.lock().await;
                room.broadcast(&ServerEvent::Cursor { user_id, x, y }, Some(user_id));
            }
            vec![]
        }
        ClientEvent::StrokeStart { stroke_id, color, width, mode, x, y } => {
            if let Some(binding) = joined_room(joined.as_ref(), user_id) {
                let mut room = binding.room.lock().await;
                room.live
                    .start(&stroke_id, user_id, mode, color.clone(), width, Point { x, y });
                room.broadcast(
                    &ServerEvent::StrokeStart { user_id, stroke_id, color, width, mode, x, y },
                    Some(user_id),
                );
            }
            vec![]
        }
        ClientEvent::StrokePoint { stroke_id, x, y } => {
            if let Some(binding) = joined_room(joined.as_ref(), user_id) {
                let mut room = binding.room.lock().await;
                room.live.extend(&stroke_id, Point { x, y });
                room.broadcast(
                    &ServerEvent::StrokePoint { user_id, stroke_id, x, y },
                    Some(user_id),
                );
            }
            vec![]
        }
        ClientEvent::StrokeEnd { stroke_id } => {
            if let Some(binding) = joined_room(joined.as_ref(), user_id) {
                let mut room = binding.room.lock().await;
                room.live.end(&stroke_id);
                room.broadcast(&ServerEvent::StrokeEnd { user_id, stroke_id }, Some(user_id));
            }
            vec![]
        }
        ClientEvent::OpCommit(candidate) => {
            if let Some(binding) = joined_room(joined.as_ref(), user_id) {
                let mut room = binding.room.lock().await;
                match room.log.commit(candidate, user_id) {
                    // The author receives the same broadcast as everyone else,
                    // so every replica converges on the server-stamped value.
                    Some(op) => room.broadcast(&ServerEvent::OpCommit(op), None),
                    None => debug!(%user_id, "rejected commit with fewer than 2 points"),
                }
            }
            vec![]
        }
        ClientEvent::OpUndo => {
            if let Some(binding) = joined_room(joined.as_ref(), user_id) {
                let mut room = binding.room.lock().await;
                room.log.undo();
                room.broadcast(&snapshot_event(&room), None);
            }
            vec![]
        }
        ClientEvent::OpRedo => {
            if let Some(binding) = joined_room(joined.as_ref(), user_id) {
                let mut room = binding.room.lock().await;
                room.log.redo();
                room.broadcast(&snapshot_event(&room), None);
            }
            vec![]
        }
        ClientEvent::CanvasClear => {
            if let Some(binding) = joined_room(joined.as_ref(), user_id) {
                let mut room = binding.room.lock().await;
                room.log.clear();
                room.broadcast(&snapshot_event(&room), None);
            }
            vec![]
        }
    }
}

// =============================================================================
// JOIN / LEAVE
// =============================================================================

async fn handle_join(
    state: &AppState,
    joined: &mut Option<JoinedRoom>,
    user_id: Uuid,
    client_tx: &mpsc::Sender<ServerEvent>,
    room_id: &str,
    username: &str,
) -> Vec<ServerEvent> {
    if joined.is_some() {
        debug!(%user_id, "dropping join from already-joined connection");
        return vec![];
    }

    let room_id = room_id.trim();
    if room_id.is_empty() {
        return vec![ServerEvent::Error { message: JoinError::EmptyRoomId.to_string() }];
    }

    let room = state.rooms.get_or_create(room_id).await;
    let (user, users, ops, canvas_size) = {
        let mut guard = room.lock().await;
        let color = guard.next_color();
        let user = guard.roster.join(user_id, username, color);
        guard.add_client(user_id, client_tx.clone());

        let users = guard.roster.list();
        let ops = guard.log.snapshot().to_vec();
        let canvas_size = guard.log.canvas_size();

        // Whole-room refresh, joiner included: the new member list, then a
        // full snapshot to close the race between the joiner's unicast
        // snapshot and commits processed around it.
        guard.broadcast(&ServerEvent::UsersUpdate { users: users.clone() }, None);
        guard.broadcast(&ServerEvent::OpsSnapshot { ops: ops.clone() }, None);

        (user, users, ops, canvas_size)
    };

    info!(%user_id, room_id, name = %user.name, "client joined room");
    *joined = Some(JoinedRoom { room_id: room_id.to_string(), room });

    vec![ServerEvent::Joined {
        room_id: room_id.to_string(),
        user,
        users,
        ops,
        canvas_size,
    }]
}

/// Remove a departed connection from its room and notify the remainder, so
/// peers can discard the member's cursor and unfinished live strokes.
async fn leave_room(binding: &JoinedRoom, user_id: Uuid) {
    let mut room = binding.room.lock().await;
    room.remove_client(user_id);
    room.roster.leave(user_id);
    room.live.remove_author(user_id);

    let users = room.roster.list();
    room.broadcast(&ServerEvent::UsersUpdate { users }, None);
    room.broadcast(&ServerEvent::UserLeft { user_id }, None);

    info!(%user_id, room_id = %binding.room_id, remaining = room.roster.len(), "client left room");
}

// =============================================================================
// HELPERS
// =============================================================================

/// Connection-state guard for events that require a joined room.
fn joined_room(joined: Option<&JoinedRoom>, user_id: Uuid) -> Option<&JoinedRoom> {
    if joined.is_none() {
        debug!(%user_id, "dropping event from unjoined connection");
    }
    joined
}

fn snapshot_event(room: &Room) -> ServerEvent {
    ServerEvent::OpsSnapshot { ops: room.log.snapshot().to_vec() }
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), ()> {
    let json = match serde_json::to_string(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize event");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
