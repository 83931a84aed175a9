//! Static cell painting.
//!
//! Walls are drawn as outlines: a wall cell strokes only the sides it shares
//! with a non-wall neighbour or the grid boundary. Strokes are half-open
//! pixel runs starting at the wall's own corner, so a wall's bottom and right
//! edges land on the first row/column of the neighbour below/right. Painting
//! such a neighbour therefore has to put that edge back after clearing.

use crate::coords::{to_cell, Layout};
use crate::fb::palette;
use crate::surface::{Point, Rect, Surface, DEFAULT_LINE_WIDTH};
use crate::types::{Cell, CellType, Heading};
use tui_pacman_core::Field;

/// Paints static cells for one [`Layout`].
#[derive(Debug, Clone, Copy)]
pub struct FieldPainter {
    layout: Layout,
}

impl FieldPainter {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Clear the surface and paint every cell in row-major order.
    pub fn paint_field<S: Surface>(&self, surface: &mut S, field: &Field) {
        let (w, h) = surface.size();
        surface.clear_rect(Rect::new(0, 0, w, h));
        for index in 0..field.cells().len() {
            self.paint_cell(surface, field, to_cell(index, field.width()));
        }
    }

    /// Repaint one cell from scratch.
    ///
    /// Cells outside the field are ignored.
    pub fn paint_cell<S: Surface>(&self, surface: &mut S, field: &Field, cell: Cell) {
        let Some(kind) = field.get(cell) else {
            return;
        };
        surface.clear_rect(self.layout.cell_rect(cell));

        if !kind.is_wall() {
            // Edges owned by the wall above / to the left.
            for towards in [Heading::Up, Heading::Left] {
                if field.is_wall_towards(cell, towards) {
                    if let Some(wall) = cell.step(towards) {
                        self.stroke_wall_edge(surface, wall, towards.opposite());
                    }
                }
            }
        }

        match kind {
            CellType::Empty => {}
            CellType::Wall => {
                for towards in [Heading::Up, Heading::Right, Heading::Down, Heading::Left] {
                    // Out of bounds counts as open.
                    if !field.is_wall_towards(cell, towards) {
                        self.stroke_wall_edge(surface, cell, towards);
                    }
                }
            }
            CellType::Dot => {
                let side = self.layout.block_size().div_ceil(10);
                let c = self.center(cell);
                let half = (side / 2) as i32;
                surface.fill_rect(Rect::new(c.x - half, c.y - half, side, side), palette::DOT);
            }
            CellType::Pellet => {
                let radius = self.layout.block_size().div_ceil(5);
                surface.fill_circle(self.center(cell), radius, palette::DOT);
            }
            CellType::Gate => {
                let origin = self.layout.cell_origin(cell);
                let y = self.center(cell).y;
                surface.set_line_width(self.layout.block_size().div_ceil(5));
                surface.stroke_line(
                    Point::new(origin.x, y),
                    Point::new(origin.x + self.layout.block_size() as i32, y),
                    palette::GATE,
                );
                surface.set_line_width(DEFAULT_LINE_WIDTH);
            }
        }
    }

    /// Repaint every field cell that intersects `rect`.
    pub fn paint_region<S: Surface>(&self, surface: &mut S, field: &Field, rect: Rect) {
        for cell in self.layout.cells_overlapping(rect) {
            self.paint_cell(surface, field, cell);
        }
    }

    fn center(&self, cell: Cell) -> Point {
        let o = self.layout.cell_origin(cell);
        let half = (self.layout.block_size() / 2) as i32;
        Point::new(o.x + half, o.y + half)
    }

    fn stroke_wall_edge<S: Surface>(&self, surface: &mut S, wall: Cell, towards: Heading) {
        if let Some((from, to)) = wall_edge(&self.layout, wall, towards) {
            surface.stroke_line(from, to, palette::WALL);
        }
    }
}

/// Pixel endpoints of the side of `cell` facing `towards`.
///
/// The run starts at the cell's corner on that side (shifted one block for
/// Down/Right) and extends one block along the perpendicular axis.
pub fn wall_edge(layout: &Layout, cell: Cell, towards: Heading) -> Option<(Point, Point)> {
    let (dy, dx) = towards.vector();
    if (dy, dx) == (0, 0) {
        return None;
    }
    let begin = Cell::new(
        if dy > 0 { cell.y + 1 } else { cell.y },
        if dx > 0 { cell.x + 1 } else { cell.x },
    );
    let end = Cell::new(begin.y + (dx != 0) as u32, begin.x + (dy != 0) as u32);
    Some((layout.cell_origin(begin), layout.cell_origin(end)))
}
