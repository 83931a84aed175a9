//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into the raw input codes the engine understands
//! (`"ArrowLeft"`, `"KeyW"`, ...) and provides [`PendingInput`], a
//! last-write-wins slot the frame loop drains at tick boundaries.

pub mod map;
pub mod pending;

pub use tui_pacman_types as types;

pub use map::{key_code, should_quit};
pub use pending::{pending_input, InputWriter, PendingInput};
