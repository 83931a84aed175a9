//! Grid to pixel conversion.
//!
//! Everything here is integer-exact so neighbouring cells share pixel
//! boundaries without seams. Fractional poses are rounded once, at the last
//! step.

use tracing::info;

use crate::error::ConfigError;
use crate::interp::Pose;
use crate::surface::{Point, Rect};
use crate::types::Cell;

/// Smallest block size that still leaves room for the 2px sprite inset.
pub const MIN_BLOCK_SIZE: u32 = 5;

/// Top-left pixel of `cell`.
///
/// ```
/// use tui_pacman_term::coords::to_pixel;
/// use tui_pacman_term::surface::Point;
/// use tui_pacman_term::types::Cell;
///
/// assert_eq!(to_pixel(Cell::new(2, 3), 10, 5), Point::new(35, 25));
/// ```
#[inline]
pub fn to_pixel(cell: Cell, block_size: u32, offset: u32) -> Point {
    Point::new(
        (cell.x * block_size + offset) as i32,
        (cell.y * block_size + offset) as i32,
    )
}

/// Row-major index to cell.
///
/// `width` must be non-zero.
#[inline]
pub fn to_cell(index: usize, width: u32) -> Cell {
    let width = width as usize;
    Cell::new((index / width) as u32, (index % width) as u32)
}

/// Pixel geometry of one grid on one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    grid_w: u32,
    grid_h: u32,
    block_size: u32,
    offset: u32,
}

impl Layout {
    /// Fit a `grid_w x grid_h` grid onto a `screen_w x screen_h` pixel screen.
    pub fn new(grid_w: u32, grid_h: u32, screen_w: u32, screen_h: u32) -> Result<Self, ConfigError> {
        if grid_w == 0 || grid_h == 0 {
            return Err(ConfigError::EmptyGrid {
                width: grid_w,
                height: grid_h,
            });
        }
        let block_size = screen_w.min(screen_h) / grid_w.max(grid_h);
        let layout = Self::with_block_size(grid_w, grid_h, block_size)?;
        info!(
            grid_w,
            grid_h,
            screen_w,
            screen_h,
            block_size,
            "layout computed"
        );
        Ok(layout)
    }

    /// Layout with an explicit block size.
    pub fn with_block_size(grid_w: u32, grid_h: u32, block_size: u32) -> Result<Self, ConfigError> {
        if grid_w == 0 || grid_h == 0 {
            return Err(ConfigError::EmptyGrid {
                width: grid_w,
                height: grid_h,
            });
        }
        if block_size < MIN_BLOCK_SIZE {
            return Err(ConfigError::ScreenTooSmall {
                block_size,
                min: MIN_BLOCK_SIZE,
            });
        }
        Ok(Self {
            grid_w,
            grid_h,
            block_size,
            offset: block_size / 2,
        })
    }

    pub fn grid_width(&self) -> u32 {
        self.grid_w
    }

    pub fn grid_height(&self) -> u32 {
        self.grid_h
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Device surface size: one spare block per axis for the draw offset.
    pub fn surface_size(&self) -> (u32, u32) {
        (
            self.block_size * (self.grid_w + 1),
            self.block_size * (self.grid_h + 1),
        )
    }

    pub fn cell_origin(&self, cell: Cell) -> Point {
        to_pixel(cell, self.block_size, self.offset)
    }

    pub fn cell_rect(&self, cell: Cell) -> Rect {
        let p = self.cell_origin(cell);
        Rect::new(p.x, p.y, self.block_size, self.block_size)
    }

    /// Top-left pixel of a fractional pose.
    pub fn pose_to_pixel(&self, pose: Pose) -> Point {
        let bs = self.block_size as f32;
        Point::new(
            (pose.x * bs).round() as i32 + self.offset as i32,
            (pose.y * bs).round() as i32 + self.offset as i32,
        )
    }

    /// Block-sized footprint at a fractional pose.
    pub fn pose_rect(&self, pose: Pose) -> Rect {
        let p = self.pose_to_pixel(pose);
        Rect::new(p.x, p.y, self.block_size, self.block_size)
    }

    /// Grid cells whose rect intersects `rect`.
    pub fn cells_overlapping(&self, rect: Rect) -> impl Iterator<Item = Cell> + '_ {
        let bs = self.block_size as i32;
        let off = self.offset as i32;
        let to_index = move |px: i32| (px - off).div_euclid(bs);
        let x0 = to_index(rect.x).max(0);
        let y0 = to_index(rect.y).max(0);
        let x1 = to_index(rect.right() - 1).min(self.grid_w as i32 - 1);
        let y1 = to_index(rect.bottom() - 1).min(self.grid_h as i32 - 1);
        let empty = rect.is_empty();
        (y0..=y1)
            .flat_map(move |y| (x0..=x1).map(move |x| Cell::new(y as u32, x as u32)))
            .filter(move |_| !empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_cell_is_row_major() {
        assert_eq!(to_cell(0, 31), Cell::new(0, 0));
        assert_eq!(to_cell(31, 31), Cell::new(1, 0));
        assert_eq!(to_cell(15 * 31 + 16, 31), Cell::new(15, 16));
    }

    #[test]
    fn block_size_follows_smaller_screen_axis() {
        let layout = Layout::new(31, 31, 640, 480).unwrap();
        assert_eq!(layout.block_size(), 15);
        assert_eq!(layout.offset(), 7);
        assert_eq!(layout.surface_size(), (480, 480));
    }

    #[test]
    fn grid_fits_inside_surface() {
        let layout = Layout::new(13, 11, 200, 200).unwrap();
        let (w, h) = layout.surface_size();
        let last = layout.cell_rect(Cell::new(10, 12));
        assert!(last.right() as u32 <= w);
        assert!(last.bottom() as u32 <= h);
    }

    #[test]
    fn rejects_empty_grid_and_tiny_screens() {
        assert_eq!(
            Layout::new(0, 10, 100, 100),
            Err(ConfigError::EmptyGrid { width: 0, height: 10 })
        );
        assert!(matches!(
            Layout::new(31, 31, 100, 100),
            Err(ConfigError::ScreenTooSmall { block_size: 3, .. })
        ));
    }

    #[test]
    fn pose_rounds_to_nearest_pixel() {
        let layout = Layout::with_block_size(31, 31, 10).unwrap();
        let p = layout.pose_to_pixel(Pose { y: 15.0, x: 15.44 });
        assert_eq!(p, Point::new(154 + 5, 150 + 5));
        assert_eq!(
            layout.pose_to_pixel(Pose { y: 2.0, x: 3.0 }),
            layout.cell_origin(Cell::new(2, 3))
        );
    }

    #[test]
    fn overlap_covers_straddled_cells() {
        let layout = Layout::with_block_size(10, 10, 10).unwrap();
        let rect = layout.pose_rect(Pose { y: 2.0, x: 3.5 });
        let cells: Vec<Cell> = layout.cells_overlapping(rect).collect();
        assert_eq!(cells, vec![Cell::new(2, 3), Cell::new(2, 4)]);

        let aligned: Vec<Cell> = layout
            .cells_overlapping(layout.cell_rect(Cell::new(4, 4)))
            .collect();
        assert_eq!(aligned, vec![Cell::new(4, 4)]);
    }
}
