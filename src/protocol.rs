//! Wire protocol — the closed event vocabulary for `sketchroom`.
//!
//! DESIGN
//! ======
//! Every message is JSON, internally tagged on `"event"`, with camelCase
//! payload fields. The two enums below are the whole contract: one for each
//! direction, so dispatch is exhaustive at compile time instead of an open
//! string-keyed table.
//!
//! Event names (`stroke:start`, `op:commit`, ...) are the stable public
//! vocabulary shared with the rendering/transport layer and never change
//! shape without a protocol revision.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// GEOMETRY
// =============================================================================

/// One point in canvas coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Fixed logical canvas dimensions, sent to joiners for initial layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// DRAWING TYPES
// =============================================================================

/// How a stroke applies to the canvas. Anything that isn't `erase` draws;
/// unknown mode strings from clients coerce to [`DrawMode::Draw`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    Erase,
    #[default]
    Draw,
}

impl<'de> Deserialize<'de> for DrawMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == "erase" { DrawMode::Erase } else { DrawMode::Draw })
    }
}

/// Kind of committed operation. Only strokes exist today; the tag keeps the
/// wire format open for future operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Stroke,
}

/// One committed, immutable polyline drawing action. The authoritative unit
/// of canvas history: replaying a room's ops in order reconstructs the
/// canvas from empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeOp {
    #[serde(rename = "type")]
    pub kind: OpKind,
    pub mode: DrawMode,
    pub color: String,
    pub width: f64,
    pub points: Vec<Point>,
    pub user_id: Uuid,
    /// Milliseconds since Unix epoch.
    pub timestamp: i64,
    pub op_id: String,
}

/// A client-proposed operation, before the server stamps author, timestamp,
/// and (when absent) an operation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_id: Option<String>,
    #[serde(default)]
    pub mode: DrawMode,
    #[serde(default)]
    pub color: String,
    pub width: f64,
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

// =============================================================================
// PARTICIPANTS
// =============================================================================

/// A connected room member as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

// =============================================================================
// CLIENT → SERVER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ClientEvent {
    #[serde(rename = "join", rename_all = "camelCase")]
    Join {
        room_id: String,
        #[serde(default)]
        username: String,
    },
    #[serde(rename = "cursor")]
    Cursor { x: f64, y: f64 },
    #[serde(rename = "stroke:start", rename_all = "camelCase")]
    StrokeStart {
        stroke_id: String,
        #[serde(default)]
        color: String,
        width: f64,
        #[serde(default)]
        mode: DrawMode,
        x: f64,
        y: f64,
    },
    #[serde(rename = "stroke:point", rename_all = "camelCase")]
    StrokePoint { stroke_id: String, x: f64, y: f64 },
    #[serde(rename = "stroke:end", rename_all = "camelCase")]
    StrokeEnd { stroke_id: String },
    #[serde(rename = "op:commit")]
    OpCommit(OpCandidate),
    #[serde(rename = "op:undo")]
    OpUndo,
    #[serde(rename = "op:redo")]
    OpRedo,
    #[serde(rename = "canvas:clear")]
    CanvasClear,
}

// =============================================================================
// SERVER → CLIENT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ServerEvent {
    /// Unicast reply to a successful join: assigned identity plus everything
    /// needed to render the room from empty.
    #[serde(rename = "joined", rename_all = "camelCase")]
    Joined {
        room_id: String,
        user: Participant,
        users: Vec<Participant>,
        ops: Vec<StrokeOp>,
        canvas_size: CanvasSize,
    },
    #[serde(rename = "users:update")]
    UsersUpdate { users: Vec<Participant> },
    #[serde(rename = "user:left", rename_all = "camelCase")]
    UserLeft { user_id: Uuid },
    #[serde(rename = "cursor", rename_all = "camelCase")]
    Cursor { user_id: Uuid, x: f64, y: f64 },
    #[serde(rename = "stroke:start", rename_all = "camelCase")]
    StrokeStart {
        user_id: Uuid,
        stroke_id: String,
        color: String,
        width: f64,
        mode: DrawMode,
        x: f64,
        y: f64,
    },
    #[serde(rename = "stroke:point", rename_all = "camelCase")]
    StrokePoint {
        user_id: Uuid,
        stroke_id: String,
        x: f64,
        y: f64,
    },
    #[serde(rename = "stroke:end", rename_all = "camelCase")]
    StrokeEnd { user_id: Uuid, stroke_id: String },
    /// The committed operation, broadcast to every member including the
    /// author so all replicas converge on the server-stamped value.
    #[serde(rename = "op:commit")]
    OpCommit(StrokeOp),
    /// Full ordered history. Always a complete replacement, never a diff.
    #[serde(rename = "ops:snapshot")]
    OpsSnapshot { ops: Vec<StrokeOp> },
    #[serde(rename = "error")]
    Error { message: String },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "protocol_test.rs"]
mod tests;
