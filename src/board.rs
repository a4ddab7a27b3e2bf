//! Fixed-size occupancy grid.
//!
//! Coordinates are `(x, y)` with `x` in `0..BOARD_WIDTH` left to right and
//! `y` in `0..BOARD_HEIGHT` top to bottom.

use crate::piece::{ActivePiece, PieceKind};

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    rows: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        let (x, y) = Self::index(x, y)?;
        Some(self.rows[y][x])
    }

    /// Writes a cell; returns false (and changes nothing) outside the grid.
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        self.get(x, y).is_some_and(Cell::is_filled)
    }

    pub fn rows(&self) -> &[[Cell; BOARD_WIDTH]; BOARD_HEIGHT] {
        &self.rows
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_filled()))
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows
            .get(y)
            .map_or(0, |row| row.iter().filter(|cell| cell.is_filled()).count())
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }

    pub fn clear(&mut self) {
        self.rows = [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
    }

    /// Writes the piece's cells into the grid. Cells above the top row are
    /// dropped; the caller has already validated the placement.
    pub fn merge(&mut self, piece: &ActivePiece) {
        for cell in piece.cells() {
            if cell.y >= 0 {
                self.set(cell.x, cell.y, Cell::Filled(piece.kind));
            }
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Scans bottom to top. After a row collapses, the same index is checked
    /// again since the row that slid into it may also be full.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = BOARD_HEIGHT;

        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.collapse_row(row);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }

    fn collapse_row(&mut self, y: usize) {
        for row in (1..=y).rev() {
            self.rows[row] = self.rows[row - 1];
        }
        self.rows[0] = [Cell::Empty; BOARD_WIDTH];
    }

    fn index(x: i16, y: i16) -> Option<(usize, usize)> {
        if x < 0 || y < 0 || x as usize >= BOARD_WIDTH || y as usize >= BOARD_HEIGHT {
            return None;
        }
        Some((x as usize, y as usize))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
