//! Board module - manages the 8x8 occupancy grid
//!
//! Each cell is empty or holds the color token of the piece occupying it.
//! Uses a flat array for cache locality and zero allocation. Coordinates are
//! (row, col), both ranging 0..8, row-major from the top-left corner.
//!
//! The board is a plain `Copy` value. The placement-facing operations
//! (`fits`, `place`, `clear_cells`) are pure: they take the board as a
//! snapshot and return a new one, so the fair-deal backtracking can branch
//! on copies without any mutation rollback.

use arrayvec::ArrayVec;

use crate::shapes::Shape;
use block_breeze_types::{Cell, ColorToken, BOARD_CELLS, BOARD_SIZE};

/// Board edge length as usize, for index arithmetic
const SIDE: usize = BOARD_SIZE as usize;

/// The game board - 8x8 cells using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (row * SIDE + col)
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_CELLS],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(row: u8, col: u8) -> Option<usize> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        Some((row as usize) * SIDE + (col as usize))
    }

    /// Get cell at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: u8, col: u8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col)
    /// Returns false if out of bounds
    pub fn set(&mut self, row: u8, col: u8, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and empty
    pub fn is_free(&self, row: u8, col: u8) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, row: u8, col: u8) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    /// Check whether the shape, anchored at (row, col), lands entirely on
    /// empty in-bounds cells. O(shape area).
    pub fn fits(&self, shape: &Shape, row: u8, col: u8) -> bool {
        // Bounding-box rejection first; widened arithmetic so hostile
        // anchors cannot overflow u8.
        if (row as usize) + (shape.rows() as usize) > SIDE
            || (col as usize) + (shape.cols() as usize) > SIDE
        {
            return false;
        }
        shape
            .cells()
            .iter()
            .all(|&(dr, dc)| self.is_free(row + dr, col + dc))
    }

    /// Commit the shape at (row, col), writing `token` into every occupied
    /// cell, and return the stamped board.
    ///
    /// Precondition: `fits(shape, row, col)` is true. Violating it means the
    /// caller skipped validation, which is an orchestration bug; the board
    /// must never be half-stamped, so this asserts instead of degrading.
    pub fn place(&self, shape: &Shape, row: u8, col: u8, token: ColorToken) -> Board {
        assert!(
            self.fits(shape, row, col),
            "place() called without a passing fits() check"
        );
        let mut next = *self;
        for &(dr, dc) in shape.cells() {
            next.set(row + dr, col + dc, Some(token));
        }
        next
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: u8) -> bool {
        match Self::index(row, 0) {
            Some(start) => self.cells[start..start + SIDE].iter().all(|cell| cell.is_some()),
            None => false,
        }
    }

    /// Check if a column is completely filled
    pub fn is_col_full(&self, col: u8) -> bool {
        if col >= BOARD_SIZE {
            return false;
        }
        (0..BOARD_SIZE).all(|row| self.is_occupied(row, col))
    }

    /// Indices of all full rows, top to bottom
    pub fn full_rows(&self) -> ArrayVec<u8, SIDE> {
        let mut rows = ArrayVec::new();
        for row in 0..BOARD_SIZE {
            if self.is_row_full(row) {
                rows.push(row);
            }
        }
        rows
    }

    /// Indices of all full columns, left to right
    pub fn full_cols(&self) -> ArrayVec<u8, SIDE> {
        let mut cols = ArrayVec::new();
        for col in 0..BOARD_SIZE {
            if self.is_col_full(col) {
                cols.push(col);
            }
        }
        cols
    }

    /// Empty every cell in any of the listed rows or columns and return the
    /// cleared board plus the number of distinct cells emptied. Cells on a
    /// row/column intersection are counted once.
    pub fn clear_cells(&self, rows: &[u8], cols: &[u8]) -> (Board, u32) {
        let mut next = *self;
        let mut cleared = 0u32;
        for &row in rows {
            for col in 0..BOARD_SIZE {
                if let Some(idx) = Self::index(row, col) {
                    if next.cells[idx].is_some() {
                        next.cells[idx] = None;
                        cleared += 1;
                    }
                }
            }
        }
        for &col in cols {
            for row in 0..BOARD_SIZE {
                if let Some(idx) = Self::index(row, col) {
                    if next.cells[idx].is_some() {
                        next.cells[idx] = None;
                        cleared += 1;
                    }
                }
            }
        }
        (next, cleared)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write the grid as raw token values into a flat array (0 = empty)
    pub fn write_token_grid(&self, out: &mut [u32; BOARD_CELLS]) {
        for (idx, cell) in self.cells.iter().enumerate() {
            out[idx] = match cell {
                Some(token) => token.rgb(),
                None => 0,
            };
        }
    }

    /// Whether every cell is empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Create from an 8x8 grid of raw token values for testing (0 = empty)
    #[cfg(test)]
    pub fn from_grid(grid: [[u32; SIDE]; SIDE]) -> Self {
        let mut board = Board::new();
        for (row, cells) in grid.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if value != 0 {
                    board.set(row as u8, col as u8, Some(ColorToken::new(value)));
                }
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
