//! Unpadded global board, assembled on the coordinating worker once a run
//! finishes. Coordinates are 0-indexed.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::data::cell::{Cell, ALIVE, ALIVE_CHAR, DEAD, DEAD_CHAR};
use crate::data::grid::Grid;
use crate::error::GridError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Allocates an all-dead `size x size` board.
    pub fn new(size: usize) -> Result<Self, GridError> {
        let len = size.checked_mul(size).ok_or(GridError::Allocation {
            rows: size,
            cols: size,
        })?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| GridError::Allocation {
                rows: size,
                cols: size,
            })?;
        cells.resize(len, DEAD);
        Ok(Self { size, cells })
    }

    /// Copies the interior of a padded grid that covers the whole board.
    pub fn from_grid(grid: &Grid) -> Result<Self, GridError> {
        let size = grid.interior_cols();
        if grid.interior_rows() != size {
            return Err(GridError::RowLength {
                expected: size,
                actual: grid.interior_rows(),
            });
        }
        let mut board = Self::new(size)?;
        for r in 0..size {
            board.set_row(r, grid.interior_row(r + 1))?;
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == ALIVE
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    pub fn set_row(&mut self, row: usize, values: &[Cell]) -> Result<(), GridError> {
        if values.len() != self.size {
            return Err(GridError::RowLength {
                expected: self.size,
                actual: values.len(),
            });
        }
        if row >= self.size {
            return Err(GridError::OutOfBounds {
                row,
                col: 0,
                rows: self.size,
                cols: self.size,
            });
        }
        self.cells[row * self.size..(row + 1) * self.size].copy_from_slice(values);
        Ok(())
    }

    pub fn alive_count(&self) -> u64 {
        self.cells.iter().filter(|&&c| c == ALIVE).count() as u64
    }

    /// Coordinates of every live cell, in row-major order.
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == ALIVE)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    /// SHA-256 of the cell states, hex encoded. Equal boards have equal
    /// digests regardless of how they were computed.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.size as u64).to_le_bytes());
        hasher.update(&self.cells);
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            for &cell in self.row(r) {
                let glyph = if cell == ALIVE { ALIVE_CHAR } else { DEAD_CHAR };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
