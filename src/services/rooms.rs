//! Room registry — one isolated session aggregate per room id.
//!
//! DESIGN
//! ======
//! A `Room` bundles everything a collaborative session owns: committed
//! history, membership, live stroke sessions, the palette counter, and the
//! outbound sender for every connected client. Rooms are created lazily on
//! first reference and live for the process lifetime.
//!
//! CONCURRENCY
//! ===========
//! Each room is its own concurrency domain: an `Arc<Mutex<Room>>` serializes
//! all mutation for that room while different rooms proceed in parallel. The
//! registry's `RwLock` guards only the id → room map, is held only for
//! lookup or insert, and never spans room work. Connections resolve their
//! room once at join time and hold the `Arc` for the connection lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, mpsc};
use uuid::Uuid;

use crate::protocol::ServerEvent;
use crate::services::drawing::DrawingLog;
use crate::services::live::LiveStrokes;
use crate::services::palette;
use crate::services::roster::Roster;

// =============================================================================
// ROOM
// =============================================================================

/// All state owned by one collaborative session.
#[derive(Debug)]
pub struct Room {
    pub log: DrawingLog,
    pub roster: Roster,
    pub live: LiveStrokes,
    /// Outbound frame senders, one per connected client.
    clients: HashMap<Uuid, mpsc::Sender<ServerEvent>>,
    /// Monotonic join counter driving palette assignment.
    color_index: usize,
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

impl Room {
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: DrawingLog::new(),
            roster: Roster::new(),
            live: LiveStrokes::new(),
            clients: HashMap::new(),
            color_index: 0,
        }
    }

    /// Display color for the next joiner. Cycles through the palette.
    pub fn next_color(&mut self) -> String {
        let color = palette::color_at(self.color_index);
        self.color_index += 1;
        color.to_string()
    }

    /// Register a client's outbound sender.
    pub fn add_client(&mut self, id: Uuid, tx: mpsc::Sender<ServerEvent>) {
        self.clients.insert(id, tx);
    }

    /// Drop a client's outbound sender. Idempotent.
    pub fn remove_client(&mut self, id: Uuid) {
        self.clients.remove(&id);
    }

    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Send an event to every connected client, optionally excluding one.
    /// Best-effort per recipient: a client with a full channel drops the
    /// frame rather than stalling the room.
    pub fn broadcast(&self, event: &ServerEvent, exclude: Option<Uuid>) {
        for (client_id, tx) in &self.clients {
            if exclude == Some(*client_id) {
                continue;
            }
            let _ = tx.try_send(event.clone());
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Concurrent map from room id to its single `Room` instance.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Arc<Mutex<Room>>>>,
}

impl RoomRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { rooms: RwLock::new(HashMap::new()) }
    }

    /// Look up a room, constructing it on first reference. The write lock
    /// guarantees a single construction per key under concurrent callers.
    pub async fn get_or_create(&self, room_id: &str) -> Arc<Mutex<Room>> {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room_id.to_string())
            .or_insert_with(|| {
                tracing::info!(room_id, "created room");
                Arc::new(Mutex::new(Room::new()))
            })
            .clone()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "rooms_test.rs"]
mod tests;
