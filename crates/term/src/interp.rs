//! Tick/subtick interpolation.
//!
//! An entity's on-screen pose between two ticks lies on the segment from its
//! previous cell one step along its heading. The fraction is clamped to
//! `[0, 1]`; `1` is the pose shown on a tick's final sub-frame.

use crate::types::{Cell, Heading, MovingEntity};

/// Fractional grid position, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub y: f32,
    pub x: f32,
}

impl Pose {
    pub fn new(y: f32, x: f32) -> Self {
        Self { y, x }
    }
}

impl From<Cell> for Pose {
    fn from(cell: Cell) -> Self {
        Self {
            y: cell.y as f32,
            x: cell.x as f32,
        }
    }
}

/// Pose after moving a fraction `f` of one step from `prev` along `heading`.
///
/// [`Heading::None`] never drifts, whatever `f` is.
///
/// ```
/// use tui_pacman_term::interp::{interpolate, Pose};
/// use tui_pacman_term::types::{Cell, Heading};
///
/// let pose = interpolate(Cell::new(15, 15), Heading::Right, 0.4);
/// assert_eq!(pose.y, 15.0);
/// assert!((pose.x - 15.4).abs() < 1e-5);
/// ```
pub fn interpolate(prev: Cell, heading: Heading, f: f32) -> Pose {
    let f = if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) };
    let (dy, dx) = heading.vector();
    Pose {
        y: prev.y as f32 + dy as f32 * f,
        x: prev.x as f32 + dx as f32 * f,
    }
}

/// Interpolated pose of `entity` at sub-fraction `f`.
pub fn pose_of(entity: &MovingEntity, f: f32) -> Pose {
    interpolate(entity.prev_cell, entity.heading, f)
}
