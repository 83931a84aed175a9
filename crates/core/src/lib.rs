//! Engine-facing model - the collaborator the renderer reads from
//!
//! This crate holds everything the presentation layer needs to know about the
//! game without simulating it:
//!
//! - [`field`]: the static maze grid with neighbour queries
//! - [`engine`]: the [`GameEngine`] trait the frame loop drives
//! - [`scripted`]: [`ScriptedEngine`], a deterministic collaborator for the
//!   demo binary, integration tests and benches
//!
//! # Example
//!
//! ```
//! use tui_pacman_core::{Field, GameEngine, ScriptedEngine};
//! use tui_pacman_types::{Cell, Difficulty, Heading};
//!
//! let field = Field::from_rows(&["#####", "#...#", "#####"]).unwrap();
//! let mut engine = ScriptedEngine::new(field, Difficulty::Normal, Cell::new(1, 1), 3).unwrap();
//!
//! engine.set_heading("ArrowRight");
//! engine.tick();
//!
//! let player = engine.player();
//! assert_eq!(player.prev_cell, Cell::new(1, 1));
//! assert_eq!(player.heading, Heading::Right);
//! ```

pub mod engine;
pub mod field;
pub mod scripted;

pub use tui_pacman_types as types;

pub use engine::GameEngine;
pub use field::{Field, FieldError};
pub use scripted::{ScriptError, ScriptedEngine};
