//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into axum handlers via the `State` extractor. It
//! holds only the room registry; every other piece of session state lives
//! inside its room so that rooms never share a lock.

use std::sync::Arc;

use crate::services::rooms::RoomRegistry;

/// Shared application state, injected into axum handlers via State extractor.
/// Clone is required by axum — the registry is Arc-wrapped.
#[derive(Clone, Default)]
pub struct AppState {
    pub rooms: Arc<RoomRegistry>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self { rooms: Arc::new(RoomRegistry::new()) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
