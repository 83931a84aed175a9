//! Terminal presentation layer.
//!
//! Turns per-tick engine snapshots into smooth sub-frame animation on an
//! abstract [`Surface`], repainting only what moved. The pipeline, leaves
//! first:
//!
//! - [`coords`]: grid/pixel conversion and the screen [`Layout`]
//! - [`atlas`]: sprite atlas addressing and asynchronous loading
//! - [`interp`]: fractional poses between ticks
//! - [`field_painter`]: static cells (wall outlines, dots, pellets, gate)
//! - [`entities`]: footprint bookkeeping and the occlusion cascade
//! - [`frame`]: the fixed-cadence frame loop
//!
//! [`PixelBuffer`] is the software surface and [`TerminalRenderer`] flushes
//! it to a terminal using half-block cells.

pub mod atlas;
pub mod config;
pub mod coords;
pub mod entities;
pub mod error;
pub mod fb;
pub mod field_painter;
pub mod frame;
pub mod interp;
pub mod pixels;
pub mod renderer;
pub mod surface;

pub use tui_pacman_core as core;
pub use tui_pacman_types as types;

pub use atlas::{sprite_offset, sprite_rect, Atlas, AtlasHandle, AtlasLoader};
pub use config::{FrameCadence, RenderConfig};
pub use coords::{to_cell, to_pixel, Layout};
pub use entities::{overwrites, plan_repaints, EntityRenderer, EntitySlot, FootprintHistory, FrameReport};
pub use error::{AtlasError, ConfigError};
pub use fb::{FrameBuffer, Rgb};
pub use field_painter::FieldPainter;
pub use frame::{FrameLoop, Outcome, Presenter, RunSummary};
pub use interp::{interpolate, pose_of, Pose};
pub use pixels::PixelBuffer;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use surface::{DrawCommand, Point, Rect, RecordingSurface, Surface, Transform};
