//! Operation log — authoritative committed history per room.
//!
//! DESIGN
//! ======
//! One append-only history plus a redo stack. The rendered canvas is always
//! defined as "replay history in order"; consumers never see incremental
//! state, only committed operations and full snapshots.
//!
//! INVARIANTS
//! ==========
//! - A candidate with fewer than 2 points is never committed.
//! - Committing clears the redo stack; diverged timelines are not kept.
//! - Undo/redo are stack-disciplined and no-ops at their empty ends.
//! - Committed operations are immutable.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::protocol::{CanvasSize, OpCandidate, OpKind, StrokeOp};

/// Logical canvas dimensions, fixed for every room.
const CANVAS_SIZE: CanvasSize = CanvasSize { width: 800, height: 500 };

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Committed stroke history plus redo stack for one room.
#[derive(Debug)]
pub struct DrawingLog {
    ops: Vec<StrokeOp>,
    redo: Vec<StrokeOp>,
    /// Source of server-assigned operation ids (`op_<n>`).
    next_op_id: u64,
}

impl Default for DrawingLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingLog {
    #[must_use]
    pub fn new() -> Self {
        Self { ops: Vec::new(), redo: Vec::new(), next_op_id: 1 }
    }

    /// Finalize a candidate into history. Returns `None` (no mutation) when
    /// the candidate has fewer than 2 points — a single point carries no
    /// renderable segment.
    ///
    /// On success the operation is stamped with the authoring participant,
    /// a timestamp (client-supplied when present), and an operation id
    /// (client-supplied when present), appended, and the redo stack cleared.
    pub fn commit(&mut self, candidate: OpCandidate, author: Uuid) -> Option<StrokeOp> {
        if candidate.points.len() < 2 {
            return None;
        }

        let op_id = candidate.op_id.unwrap_or_else(|| {
            let id = format!("op_{}", self.next_op_id);
            self.next_op_id += 1;
            id
        });
        let committed = StrokeOp {
            kind: OpKind::Stroke,
            mode: candidate.mode,
            color: candidate.color,
            width: candidate.width,
            points: candidate.points,
            user_id: author,
            timestamp: candidate.timestamp.unwrap_or_else(now_ms),
            op_id,
        };
        self.ops.push(committed.clone());
        self.redo.clear();
        Some(committed)
    }

    /// Move the most recent operation from history to the redo stack.
    /// Returns `None` when history is empty, leaving state unchanged.
    pub fn undo(&mut self) -> Option<StrokeOp> {
        let removed = self.ops.pop()?;
        self.redo.push(removed.clone());
        Some(removed)
    }

    /// Move the most recently undone operation back onto history.
    /// Returns `None` when the redo stack is empty, leaving state unchanged.
    pub fn redo(&mut self) -> Option<StrokeOp> {
        let op = self.redo.pop()?;
        self.ops.push(op.clone());
        Some(op)
    }

    /// Drop history and redo stack.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.redo.clear();
    }

    /// Full ordered history, sufficient to reconstruct the canvas from empty.
    #[must_use]
    pub fn snapshot(&self) -> &[StrokeOp] {
        &self.ops
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn canvas_size(&self) -> CanvasSize {
        CANVAS_SIZE
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "drawing_test.rs"]
mod tests;
