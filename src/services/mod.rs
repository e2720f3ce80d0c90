//! Domain services used by the websocket coordinator.
//!
//! ARCHITECTURE
//! ============
//! Service modules own session state and its rules — history, membership,
//! live strokes, rooms — so the coordinator can stay focused on protocol
//! translation and broadcast policy.

pub mod drawing;
pub mod live;
pub mod palette;
pub mod rooms;
pub mod roster;
