//! TUI Pac-Man (workspace facade crate).
//!
//! This package exposes `tui_pacman::{core,input,term,types}` while the
//! implementation lives in dedicated crates under `crates/`. The [`demo`]
//! module holds the built-in maze and pursuer routes the binary plays.

pub mod demo;
pub mod logging;

pub use tui_pacman_core as core;
pub use tui_pacman_input as input;
pub use tui_pacman_term as term;
pub use tui_pacman_types as types;
