//! Board module - manages the game grid
//!
//! The board is a width x height grid where each cell is empty or filled with the kind
//! of the piece that settled there. Cells live in one flat row-major buffer that is
//! allocated once and never resized; clearing rows shifts the survivors down in place.
//!
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Rows above the board (y < 0) are not stored.

use crate::config::{check_dimension, ConfigError};
use crate::pieces::{Piece, Shape};
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Box<[Cell]>,
}

impl Board {
    /// Create an empty 10x20 board
    pub fn new() -> Self {
        Self::blank(BOARD_WIDTH, BOARD_HEIGHT)
    }

    /// Create an empty board of the given size
    pub fn with_size(width: u8, height: u8) -> Result<Self, ConfigError> {
        check_dimension("width", width as usize)?;
        check_dimension("height", height as usize)?;
        Ok(Self::blank(width, height))
    }

    fn blank(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize].into_boxed_slice(),
        }
    }

    /// Parse a board from text rows.
    ///
    /// `.` is an empty cell; a piece letter (`I O T S Z J L`, any case) is a settled
    /// cell of that kind. All rows must have the same length.
    pub fn from_ascii(rows: &[&str]) -> Result<Self, ConfigError> {
        let height = check_dimension("height", rows.len())?;
        let width = check_dimension("width", rows.first().map_or(0, |r| r.chars().count()))?;

        let mut board = Self::blank(width, height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width as usize {
                return Err(ConfigError::MalformedBoard(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    other => Some(PieceKind::from_str(&other.to_string()).ok_or_else(|| {
                        ConfigError::MalformedBoard(format!("unknown cell {:?} at ({}, {})", other, x, y))
                    })?),
                };
                board.cells[y * width as usize + x] = cell;
            }
        }
        Ok(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x.into(), y.into()).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x.into(), y.into()) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether `shape` anchored at (x, y) fits.
    ///
    /// Every filled cell must lie in a column of the board and above the floor.
    /// Cells above the top edge (y < 0) only need a valid column; cells on the board
    /// must also be empty.
    pub fn can_place(&self, shape: &Shape, x: i16, y: i16) -> bool {
        shape.cells().iter().all(|&(col, row)| {
            let bx = x + i16::from(col);
            let by = y + i16::from(row);
            if bx < 0 || bx >= self.width as i16 || by >= self.height as i16 {
                return false;
            }
            match self.index(bx, by) {
                Some(idx) => self.cells[idx].is_none(),
                None => true,
            }
        })
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map_or(false, |row| row.iter().all(|cell| cell.is_some()))
    }

    /// Indices of all full rows, top to bottom
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.height as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Clear all full rows and return their indices (top to bottom).
    ///
    /// Full rows are found first and then removed together: surviving rows keep
    /// their order and slide down, and empty rows fill the top.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let cleared = self.full_rows();
        if cleared.is_empty() {
            return cleared;
        }

        let width = self.width as usize;
        let mut write_y = self.height as usize;

        // Scan from bottom to top, compacting kept rows toward the floor
        for read_y in (0..self.height as usize).rev() {
            if cleared.binary_search(&read_y).is_ok() {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                let dst_start = write_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, dst_start);
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// Write a piece's cells into the grid.
    ///
    /// Cells above the top edge are discarded. Returns (written, dropped).
    pub fn write_piece(&mut self, piece: &Piece) -> (u32, u32) {
        let mut written = 0;
        let mut dropped = 0;
        for (x, y) in piece.blocks() {
            if y < 0 {
                dropped += 1;
                continue;
            }
            if self.set(x, y, Some(piece.kind)) {
                written += 1;
            }
        }
        (written, dropped)
    }

    /// Number of filled cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// One row of cells
    /// Returns None if out of bounds
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let width = self.width as usize;
        Some(&self.cells[y * width..(y + 1) * width])
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width as usize)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = None;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
