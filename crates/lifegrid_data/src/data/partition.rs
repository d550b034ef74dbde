//! Row decomposition of a square board across a fixed set of workers.
//!
//! Rows are 1-based global coordinates. Every worker but the last owns
//! `ceil(size / workers)` rows; the last worker absorbs whatever remains.
//! All functions are pure, so any worker can compute its own range or a
//! peer's without coordination.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    size: usize,
    workers: usize,
}

impl Partition {
    /// Plans `size` rows over `workers` workers. Requires
    /// `1 <= workers <= size`.
    pub fn new(size: usize, workers: usize) -> Result<Self, GridError> {
        if size == 0 || workers == 0 || workers > size {
            return Err(GridError::InvalidPartition { size, workers });
        }
        Ok(Self { size, workers })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// `ceil(size / workers)`.
    #[inline]
    pub fn rows_per_worker(&self) -> usize {
        self.size.div_ceil(self.workers)
    }

    /// First global row owned by `rank` (inclusive).
    ///
    /// Clamped to `size + 1` so that trailing workers of a lopsided plan own
    /// an empty range instead of rows past the board.
    pub fn start_row(&self, rank: usize) -> usize {
        (rank * self.rows_per_worker() + 1).min(self.size + 1)
    }

    /// One past the last global row owned by `rank`.
    pub fn end_row(&self, rank: usize) -> usize {
        if rank + 1 >= self.workers {
            self.size + 1
        } else {
            ((rank + 1) * self.rows_per_worker() + 1).min(self.size + 1)
        }
    }

    /// Half-open global row range `[start_row, end_row)` of `rank`.
    pub fn range(&self, rank: usize) -> Range<usize> {
        self.start_row(rank)..self.end_row(rank)
    }

    /// Number of rows owned by `rank`.
    pub fn local_rows(&self, rank: usize) -> usize {
        self.end_row(rank) - self.start_row(rank)
    }

    /// Worker owning global row `row` (1-based).
    pub fn owner_of(&self, row: usize) -> usize {
        (row.saturating_sub(1) / self.rows_per_worker()).min(self.workers - 1)
    }

    /// Maps a global row to the local padded row index on its owner.
    pub fn local_index(&self, row: usize) -> usize {
        row - self.start_row(self.owner_of(row)) + 1
    }

    /// First worker whose range is empty, if any.
    ///
    /// With ceiling-sized chunks a plan such as 5 rows over 4 workers leaves
    /// the tail without rows; such plans cannot run a halo exchange.
    pub fn first_empty_worker(&self) -> Option<usize> {
        (0..self.workers).find(|&rank| self.local_rows(rank) == 0)
    }

    /// Fails with [`GridError::InvalidPartition`] unless every worker owns
    /// at least one row.
    pub fn ensure_nonempty(&self) -> Result<(), GridError> {
        match self.first_empty_worker() {
            Some(_) => Err(GridError::InvalidPartition {
                size: self.size,
                workers: self.workers,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let plan = Partition::new(8, 4).unwrap();
        assert_eq!(plan.rows_per_worker(), 2);
        assert_eq!(plan.range(0), 1..3);
        assert_eq!(plan.range(3), 7..9);
        assert_eq!(plan.local_rows(3), 2);
    }

    #[test]
    fn test_last_worker_absorbs_remainder() {
        let plan = Partition::new(10, 4).unwrap();
        assert_eq!(plan.rows_per_worker(), 3);
        assert_eq!(plan.local_rows(0), 3);
        assert_eq!(plan.local_rows(2), 3);
        assert_eq!(plan.local_rows(3), 1);
        assert_eq!(plan.range(3), 10..11);
    }

    #[test]
    fn test_owner_of_tail_rows() {
        let plan = Partition::new(10, 4).unwrap();
        assert_eq!(plan.owner_of(1), 0);
        assert_eq!(plan.owner_of(3), 0);
        assert_eq!(plan.owner_of(4), 1);
        assert_eq!(plan.owner_of(10), 3);
        assert_eq!(plan.local_index(4), 1);
        assert_eq!(plan.local_index(10), 1);
    }

    #[test]
    fn test_rejects_more_workers_than_rows() {
        assert!(Partition::new(3, 4).is_err());
        assert!(Partition::new(0, 1).is_err());
        assert!(Partition::new(4, 0).is_err());
    }

    #[test]
    fn test_lopsided_plan_has_empty_tail() {
        let plan = Partition::new(5, 4).unwrap();
        assert_eq!(plan.rows_per_worker(), 2);
        assert_eq!(plan.range(2), 5..6);
        assert_eq!(plan.local_rows(3), 0);
        assert_eq!(plan.first_empty_worker(), Some(3));
        assert!(plan.ensure_nonempty().is_err());
        // Row 5 is still owned by the worker whose range contains it.
        assert_eq!(plan.owner_of(5), 2);
    }

    #[test]
    fn test_single_worker_owns_everything() {
        let plan = Partition::new(7, 1).unwrap();
        assert_eq!(plan.range(0), 1..8);
        assert!(plan.ensure_nonempty().is_ok());
    }
}
