//! Padded, row-major cell storage.
//!
//! A worker's grid holds its interior rows plus a one-cell ring of padding:
//! row `0` and row `rows - 1` are halo rows, column `0` and column
//! `cols - 1` are a permanent border. Interior coordinates therefore run
//! `1..=interior_rows()` and `1..=interior_cols()`.

use crate::data::cell::{Cell, ALIVE, DEAD};
use crate::error::GridError;

/// Contiguous 2D buffer with row-stride indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates a zero-filled `rows x cols` buffer.
    ///
    /// Allocation is fallible: a size overflow or a refused reservation is
    /// reported as [`GridError::Allocation`] instead of aborting the process.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(GridError::Allocation { rows, cols })?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| GridError::Allocation { rows, cols })?;
        cells.resize(len, DEAD);
        Ok(Self { rows, cols, cells })
    }

    /// Allocates a grid for `interior_rows x interior_cols` cells plus the
    /// padding ring.
    pub fn padded(interior_rows: usize, interior_cols: usize) -> Result<Self, GridError> {
        Self::padded_within(interior_rows, interior_cols, None)
    }

    /// Like [`Grid::padded`], but refuses buffers larger than `max_cells`.
    pub fn padded_within(
        interior_rows: usize,
        interior_cols: usize,
        max_cells: Option<usize>,
    ) -> Result<Self, GridError> {
        let rows = interior_rows
            .checked_add(2)
            .ok_or(GridError::Allocation {
                rows: interior_rows,
                cols: interior_cols,
            })?;
        let cols = interior_cols
            .checked_add(2)
            .ok_or(GridError::Allocation {
                rows: interior_rows,
                cols: interior_cols,
            })?;
        if let Some(limit) = max_cells {
            let over = rows.checked_mul(cols).map_or(true, |len| len > limit);
            if over {
                return Err(GridError::Allocation { rows, cols });
            }
        }
        Self::new(rows, cols)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn interior_rows(&self) -> usize {
        self.rows.saturating_sub(2)
    }

    #[inline]
    pub fn interior_cols(&self) -> usize {
        self.cols.saturating_sub(2)
    }

    #[inline(always)]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    /// Checked variant of [`Grid::set`].
    pub fn try_set(&mut self, row: usize, col: usize, value: Cell) -> Result<(), GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.set(row, col, value);
        Ok(())
    }

    /// Full padded row, border columns included.
    #[inline]
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [Cell] {
        let start = row * self.cols;
        &mut self.cells[start..start + self.cols]
    }

    /// The `interior_cols()` cells of a row, without the border columns.
    #[inline]
    pub fn interior_row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols + 1;
        &self.cells[start..start + self.interior_cols()]
    }

    /// Overwrites the interior columns of `row` with `values`.
    pub fn set_interior_row(&mut self, row: usize, values: &[Cell]) -> Result<(), GridError> {
        let expected = self.interior_cols();
        if values.len() != expected {
            return Err(GridError::RowLength {
                expected,
                actual: values.len(),
            });
        }
        if row >= self.rows {
            return Err(GridError::OutOfBounds {
                row,
                col: 1,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let start = row * self.cols + 1;
        self.cells[start..start + expected].copy_from_slice(values);
        Ok(())
    }

    /// Zero-fills row 0, the last row, column 0 and the last column.
    pub fn clear_border(&mut self) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        self.row_mut(0).fill(DEAD);
        self.row_mut(last_row).fill(DEAD);
        for r in 0..self.rows {
            let start = r * self.cols;
            self.cells[start] = DEAD;
            self.cells[start + last_col] = DEAD;
        }
    }

    /// Number of live interior cells.
    pub fn alive_count(&self) -> u64 {
        (1..=self.interior_rows())
            .map(|r| {
                self.interior_row(r)
                    .iter()
                    .filter(|&&c| c == ALIVE)
                    .count() as u64
            })
            .sum()
    }

    /// Flat backing storage, `rows * cols` cells in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}
