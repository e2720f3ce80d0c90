//! Live stroke relay — in-progress strokes, before commit.
//!
//! DESIGN
//! ======
//! A stroke-in-progress is a three-state sequence per client-chosen stroke
//! id: started → extending (zero or more points) → ended. Sessions exist so
//! the coordinator can forward low-latency preview segments to the author's
//! peers; once the author commits, the full point list in the operation log
//! supersedes everything relayed here.
//!
//! Stroke ids are client-generated with only best-effort uniqueness, so
//! every operation absorbs races: a duplicate start overwrites (last start
//! wins), and points or ends for unknown ids are no-ops. Nothing here ever
//! errors a connection, and nothing here touches the operation log.

use std::collections::HashMap;

use uuid::Uuid;

use crate::protocol::{DrawMode, Point};

/// One uncommitted stroke being previewed in real time.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStroke {
    pub author: Uuid,
    pub mode: DrawMode,
    pub color: String,
    pub width: f64,
    pub last_point: Point,
}

/// Active live-stroke sessions for one room, keyed by stroke id.
#[derive(Debug, Default)]
pub struct LiveStrokes {
    sessions: HashMap<String, LiveStroke>,
}

impl LiveStrokes {
    #[must_use]
    pub fn new() -> Self {
        Self { sessions: HashMap::new() }
    }

    /// Register a stroke session. A colliding stroke id overwrites the stale
    /// session rather than erroring the connection.
    pub fn start(
        &mut self,
        stroke_id: &str,
        author: Uuid,
        mode: DrawMode,
        color: String,
        width: f64,
        origin: Point,
    ) {
        let session = LiveStroke { author, mode, color, width, last_point: origin };
        if self.sessions.insert(stroke_id.to_string(), session).is_some() {
            tracing::warn!(stroke_id, %author, "live stroke id collision, last start wins");
        }
    }

    /// Update the last-known point. Unknown ids are absorbed as no-ops: the
    /// end may have raced ahead of a late point.
    pub fn extend(&mut self, stroke_id: &str, point: Point) {
        if let Some(session) = self.sessions.get_mut(stroke_id) {
            session.last_point = point;
        }
    }

    /// Discard a session unconditionally. Idempotent.
    pub fn end(&mut self, stroke_id: &str) {
        self.sessions.remove(stroke_id);
    }

    /// Discard every session started by one author. A disconnect never
    /// delivers the matching `stroke:end`s, so the room purges them itself.
    pub fn remove_author(&mut self, author: Uuid) {
        self.sessions.retain(|_, session| session.author != author);
    }

    #[must_use]
    pub fn get(&self, stroke_id: &str) -> Option<&LiveStroke> {
        self.sessions.get(stroke_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "live_test.rs"]
mod tests;
