use thiserror::Error;

/// Errors raised by grid storage and partition planning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The backing buffer could not be obtained.
    #[error("Unable to allocate space for a {rows}x{cols} grid")]
    Allocation { rows: usize, cols: usize },

    /// A cell coordinate fell outside the buffer.
    #[error("Cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A row payload did not match the interior width.
    #[error("Row length mismatch: expected {expected}, got {actual}")]
    RowLength { expected: usize, actual: usize },

    /// The size/worker combination cannot be decomposed.
    #[error("Cannot partition a board of size {size} across {workers} workers")]
    InvalidPartition { size: usize, workers: usize },
}
