//! Session membership — who is currently in a room.
//!
//! DESIGN
//! ======
//! Members are kept in join order so every client renders the same user list
//! without sorting. Joining never fails; name and color policy live here,
//! room-id validation lives in the coordinator.

use uuid::Uuid;

use crate::protocol::Participant;

/// Insertion-ordered set of room members, keyed by connection id.
#[derive(Debug, Default)]
pub struct Roster {
    members: Vec<Participant>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Register a member. The requested name is trimmed; a blank name falls
    /// back to `User-<first 4 hex of the connection id>`.
    pub fn join(&mut self, id: Uuid, requested_name: &str, color: String) -> Participant {
        let trimmed = requested_name.trim();
        let name = if trimmed.is_empty() {
            format!("User-{}", &id.simple().to_string()[..4])
        } else {
            trimmed.to_string()
        };
        let member = Participant { id, name, color };
        self.members.push(member.clone());
        member
    }

    /// Remove a member. Removing an absent id is a no-op.
    pub fn leave(&mut self, id: Uuid) {
        self.members.retain(|m| m.id != id);
    }

    /// Members in join order.
    #[must_use]
    pub fn list(&self) -> Vec<Participant> {
        self.members.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "roster_test.rs"]
mod tests;
