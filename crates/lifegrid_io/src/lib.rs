//! # Lifegrid IO
//!
//! Message-passing layer between the workers of a distributed run.
//!
//! This crate provides:
//! - Structured error handling for communication failures
//! - The `Transport` seam and an in-process channel mesh implementing it
//! - The two-phase halo exchange between row-adjacent workers
//! - Gathering the distributed board onto the coordinating worker
//! - Collective failure agreement and abort

/// Failure agreement and abort broadcast
pub mod collective;
/// Error types and result aliases for communication
pub mod error;
/// Boundary-row exchange between neighbouring partitions
pub mod exchange;
/// Final board assembly on the coordinating worker
pub mod gather;
/// Point-to-point tagged messaging
pub mod transport;

pub use collective::{abort, agree, all_reduce_max, Verdict};
pub use error::{CommError, Result};
pub use exchange::{HaloExchange, Neighbors, PendingExchange};
pub use gather::{gather_board, COORDINATOR};
pub use transport::{ChannelEndpoint, ChannelMesh, RecvRequest, Tag, Transport};
