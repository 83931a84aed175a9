//! Field module - the static maze grid
//!
//! The field is a `width x height` grid of [`CellType`]s stored row-major.
//! Coordinates are `(y, x)` with `y` growing downwards. Only the engine mutates
//! the field, and only to consume dots and pellets.

use thiserror::Error;

use crate::types::{Cell, CellType, Heading};

/// Reasons a field cannot be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("field dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown maze character {ch:?} at row {row}, column {col}")]
    UnknownCell { ch: char, row: usize, col: usize },

    #[error("field has {found} cells, expected {expected}")]
    WrongLength { expected: usize, found: usize },
}

/// The maze grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    width: u32,
    height: u32,
    dot_count: usize,
    cells: Vec<CellType>,
}

impl Field {
    /// Build a field from row-major cells.
    pub fn new(width: u32, height: u32, cells: Vec<CellType>) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::EmptyDimensions { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if cells.len() != expected {
            return Err(FieldError::WrongLength {
                expected,
                found: cells.len(),
            });
        }
        let dot_count = cells.iter().filter(|c| c.is_edible()).count();
        Ok(Self {
            width,
            height,
            dot_count,
            cells,
        })
    }

    /// Parse an ASCII maze, one string per row.
    ///
    /// `#` wall, `.` dot, `o` pellet, `-` gate, space empty.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, FieldError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(FieldError::EmptyDimensions {
                width: width as u32,
                height: height as u32,
            });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(FieldError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = CellType::from_char(ch).ok_or(FieldError::UnknownCell { ch, row, col })?;
                cells.push(cell);
            }
        }

        Self::new(width as u32, height as u32, cells)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cells, `width * height` long.
    pub fn cells(&self) -> &[CellType] {
        &self.cells
    }

    /// Dots and pellets left to eat.
    pub fn dot_count(&self) -> usize {
        self.dot_count
    }

    #[inline(always)]
    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.y >= self.height || cell.x >= self.width {
            return None;
        }
        Some((cell.y as usize) * (self.width as usize) + (cell.x as usize))
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    /// Cell type at `cell`, `None` when out of bounds.
    pub fn get(&self, cell: Cell) -> Option<CellType> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Cell type at `cell`; out-of-bounds reads as empty.
    pub fn at(&self, cell: Cell) -> CellType {
        self.get(cell).unwrap_or_default()
    }

    /// Neighbour of `cell` along `heading`, `None` when it leaves the grid.
    pub fn neighbor(&self, cell: Cell, heading: Heading) -> Option<CellType> {
        cell.step(heading).and_then(|n| self.get(n))
    }

    /// Whether the neighbour along `heading` is a wall.
    ///
    /// Anything outside the grid is not a wall.
    pub fn is_wall_towards(&self, cell: Cell, heading: Heading) -> bool {
        matches!(self.neighbor(cell, heading), Some(CellType::Wall))
    }

    /// Eat whatever is at `cell`, returning what was there.
    ///
    /// Only dots and pellets are consumed; other cells are left alone.
    pub fn consume(&mut self, cell: Cell) -> Option<CellType> {
        let idx = self.index(cell)?;
        let found = self.cells[idx];
        if !found.is_edible() {
            return None;
        }
        self.cells[idx] = CellType::Empty;
        self.dot_count -= 1;
        Some(found)
    }
}
