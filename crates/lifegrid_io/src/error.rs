//! Error types for lifegrid_io crate.
//!
//! Communication between workers is a trusted internal protocol, so these
//! errors describe a peer going away or the run being aborted rather than
//! malformed traffic.

use lifegrid_data::GridError;
use thiserror::Error;

use crate::transport::Tag;

#[derive(Error, Debug)]
pub enum CommError {
    /// The peer's endpoint was dropped before the message arrived.
    #[error("Worker {peer} disconnected while waiting for {tag:?}")]
    Disconnected { peer: usize, tag: Tag },

    /// A rank outside the communicator, or a message addressed to oneself.
    #[error("Invalid rank {rank} for a communicator of size {size}")]
    InvalidRank { rank: usize, size: usize },

    /// A row payload did not have the expected length.
    #[error("Payload from worker {peer} has {actual} cells, expected {expected}")]
    PayloadLength {
        peer: usize,
        expected: usize,
        actual: usize,
    },

    /// The run was aborted collectively.
    #[error("Run aborted by worker {origin} (code {code})")]
    Aborted { origin: usize, code: u8 },

    /// Grid storage errors.
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<CommError>,
    },
}

/// Result type alias for lifegrid_io operations.
pub type Result<T> = std::result::Result<T, CommError>;

impl CommError {
    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error, or the error it wraps, is a collective abort.
    pub fn is_abort(&self) -> bool {
        match self {
            Self::Aborted { .. } => true,
            Self::Context { source, .. } => source.is_abort(),
            _ => false,
        }
    }

    /// Whether this error only reflects a failure elsewhere: an abort notice
    /// or a peer whose endpoint is already gone.
    pub fn is_secondary(&self) -> bool {
        match self {
            Self::Aborted { .. } | Self::Disconnected { .. } => true,
            Self::Context { source, .. } => source.is_secondary(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CommError::Aborted { origin: 2, code: 2 };
        assert_eq!(err.to_string(), "Run aborted by worker 2 (code 2)");
    }

    #[test]
    fn test_error_context() {
        let err = CommError::InvalidRank { rank: 5, size: 4 }.with_context("halo exchange");
        assert!(err.to_string().contains("halo exchange"));
        assert!(!err.is_abort());
    }

    #[test]
    fn test_abort_seen_through_context() {
        let err = CommError::Aborted { origin: 0, code: 2 }.with_context("gather");
        assert!(err.is_abort());
    }

    #[test]
    fn test_disconnect_is_secondary_but_not_abort() {
        let err = CommError::Disconnected {
            peer: 1,
            tag: Tag::Exchange,
        }
        .with_context("halo exchange");
        assert!(err.is_secondary());
        assert!(!err.is_abort());
        assert!(CommError::Aborted { origin: 0, code: 1 }.is_secondary());
        let err = CommError::PayloadLength {
            peer: 3,
            expected: 8,
            actual: 1,
        };
        assert!(!err.is_secondary());
    }

    #[test]
    fn test_from_grid_error() {
        let err: CommError = GridError::Allocation { rows: 3, cols: 3 }.into();
        assert!(matches!(err, CommError::Grid(_)));
    }
}
