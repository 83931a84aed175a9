//! Colour and terminal-cell framebuffer types.
//!
//! A terminal cell shows two vertically stacked pixels using the upper half
//! block glyph: the foreground paints the upper pixel, the background the
//! lower one.

use crate::pixels::PixelBuffer;
use crate::surface::Rect;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Fixed palette used by the painters.
pub mod palette {
    use super::Rgb;

    pub const BACKGROUND: Rgb = Rgb::new(0, 0, 0);
    pub const WALL: Rgb = Rgb::new(255, 0, 0);
    pub const DOT: Rgb = Rgb::new(255, 184, 174);
    pub const GATE: Rgb = Rgb::new(255, 184, 174);
}

/// Glyph used for every cell.
pub const HALF_BLOCK: char = '▀';

/// A single terminal cell holding two pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub upper: Rgb,
    pub lower: Rgb,
}

/// 2D framebuffer of half-block terminal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    /// Terminal size needed to show `pixels` (two pixel rows per cell row).
    pub fn size_for(pixels: &PixelBuffer) -> (u16, u16) {
        let w = pixels.width().min(u16::MAX as u32) as u16;
        let h = pixels.height().div_ceil(2).min(u16::MAX as u32) as u16;
        (w, h)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the framebuffer.
    ///
    /// This preserves the underlying allocation when possible.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.cells.clear();
        self.cells.resize(len, Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Copy the pixels inside `region` (all of them when `None`) into cells.
    pub fn compose(&mut self, pixels: &PixelBuffer, region: Option<Rect>) {
        let full = Rect::new(0, 0, pixels.width(), pixels.height());
        let Some(region) = region.unwrap_or(full).intersect(&full) else {
            return;
        };

        let row0 = (region.y / 2) as u16;
        let row1 = ((region.bottom() + 1) / 2) as u16;
        let col0 = region.x as u16;
        let col1 = region.right() as u16;
        for cy in row0..row1.min(self.height) {
            for cx in col0..col1.min(self.width) {
                let upper = pixels.get(cx as u32, cy as u32 * 2).unwrap_or_default();
                let lower = pixels
                    .get(cx as u32, cy as u32 * 2 + 1)
                    .unwrap_or(palette::BACKGROUND);
                self.set(cx, cy, Cell { upper, lower });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;

    #[test]
    fn compose_packs_two_rows_per_cell() {
        let mut px = PixelBuffer::new(2, 3);
        px.fill_rect(Rect::new(0, 0, 1, 1), Rgb::new(255, 0, 0));
        px.fill_rect(Rect::new(0, 1, 1, 1), Rgb::new(0, 255, 0));
        px.fill_rect(Rect::new(1, 2, 1, 1), Rgb::new(0, 0, 255));

        let (w, h) = FrameBuffer::size_for(&px);
        assert_eq!((w, h), (2, 2));
        let mut fb = FrameBuffer::new(w, h);
        fb.compose(&px, None);

        assert_eq!(fb.get(0, 0).unwrap().upper, Rgb::new(255, 0, 0));
        assert_eq!(fb.get(0, 0).unwrap().lower, Rgb::new(0, 255, 0));
        assert_eq!(fb.get(1, 1).unwrap().upper, Rgb::new(0, 0, 255));
        assert_eq!(fb.get(1, 1).unwrap().lower, palette::BACKGROUND);
    }

    #[test]
    fn compose_region_leaves_other_cells() {
        let mut px = PixelBuffer::new(4, 4);
        px.fill_rect(Rect::new(0, 0, 4, 4), Rgb::new(9, 9, 9));
        let mut fb = FrameBuffer::new(4, 2);
        fb.compose(&px, Some(Rect::new(2, 2, 2, 2)));
        assert_eq!(fb.get(0, 0).unwrap(), Cell::default());
        assert_eq!(fb.get(3, 1).unwrap().upper, Rgb::new(9, 9, 9));
    }

    #[test]
    fn resize_resets_cells() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set(1, 1, Cell { upper: Rgb::new(1, 1, 1), lower: Rgb::new(1, 1, 1) });
        fb.resize(3, 3);
        assert_eq!(fb.cells().len(), 9);
        assert!(fb.cells().iter().all(|c| *c == Cell::default()));
    }
}
