//! Board module - manages the Tetris grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices removed by a single clear, bottom to top.
pub type ClearedRows = ArrayVec<usize, { BOARD_HEIGHT as usize }>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// True iff every cell maps to an in-bounds, unoccupied board cell.
    pub fn can_place(&self, cells: &[(i8, i8)]) -> bool {
        cells.iter().all(|&(x, y)| self.is_valid(x, y))
    }

    /// Write piece cells into the board.
    ///
    /// Nothing is written unless every cell is placeable, so a rejected merge
    /// leaves the board untouched.
    pub fn merge(&mut self, cells: &[(i8, i8)], kind: PieceKind) -> bool {
        if !self.can_place(cells) {
            return false;
        }
        for &(x, y) in cells {
            self.set(x, y, Some(kind));
        }
        true
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Number of filled cells in a row (0 for out-of-range rows).
    pub fn row_fill(&self, y: usize) -> usize {
        if y >= BOARD_HEIGHT as usize {
            return 0;
        }
        let start = y * BOARD_WIDTH as usize;
        self.cells[start..start + BOARD_WIDTH as usize]
            .iter()
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Remove one row regardless of its contents and shift every row above down by one.
    ///
    /// Returns false for out-of-range rows.
    pub fn remove_row(&mut self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }

        let width = BOARD_WIDTH as usize;
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }
        self.cells[..width].fill(None);
        true
    }

    /// Remove every full row, compacting the rest downward in order.
    ///
    /// Each surviving row moves down by the number of full rows below it and
    /// empty rows are inserted at the top. Returns the cleared row indices
    /// (as they were before the clear), bottom to top.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        self.cells[..write_y * width].fill(None);
        cleared_rows
    }

    /// Snapshot the board into a compact grid of piece codes (0 = empty).
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * width + x].map_or(0, |k| k.code());
            }
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Build a board from text rows, top to bottom. `.` is empty, a piece
    /// letter fills the cell with that kind, any other char fills with `I`.
    /// Missing rows at the top are empty.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let offset = (BOARD_HEIGHT as usize).saturating_sub(rows.len());
        for (i, row) in rows.iter().take(BOARD_HEIGHT as usize).enumerate() {
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                if ch == '.' {
                    continue;
                }
                let kind = PieceKind::from_str(ch.encode_utf8(&mut [0; 4])).unwrap_or(PieceKind::I);
                board.set(x as i8, (offset + i) as i8, Some(kind));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_merge_rejects_partial_overlap_without_writing() {
        let mut board = Board::new();
        board.set(4, 5, Some(PieceKind::T));

        let cells = [(3, 5), (4, 5), (3, 6), (4, 6)];
        assert!(!board.merge(&cells, PieceKind::O));
        assert_eq!(board.get(3, 5), Some(None));
        assert_eq!(board.get(3, 6), Some(None));
    }

    #[test]
    fn test_clear_more_than_four_rows_does_not_overflow() {
        let rows = ["XXXXXXXXXX"; 6];
        let mut board = Board::from_rows(&rows);
        assert_eq!(board.clear_full_rows().len(), 6);
        assert!(board.cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_from_rows_aligns_to_bottom() {
        let board = Board::from_rows(&["T.........", "LLLL......"]);
        assert_eq!(board.get(0, 18), Some(Some(PieceKind::T)));
        assert_eq!(board.get(3, 19), Some(Some(PieceKind::L)));
        assert_eq!(board.get(0, 17), Some(None));
    }
}
