//! Final board assembly.
//!
//! Every worker except the coordinator (rank 0) sends its interior rows, one
//! message per row, in ascending order. The coordinator places them at their
//! global positions and is the only worker that ends up with a [`Board`].

use lifegrid_core::RunMetrics;
use lifegrid_data::{Board, Grid, Partition};

use crate::error::{CommError, Result};
use crate::transport::{Tag, Transport};

pub const COORDINATOR: usize = 0;

/// Collects the distributed board on the coordinator.
///
/// Returns `Some(board)` on rank 0 and `None` everywhere else.
pub async fn gather_board<T: Transport + ?Sized>(
    transport: &T,
    partition: &Partition,
    grid: &Grid,
    metrics: &RunMetrics,
) -> Result<Option<Board>> {
    let rank = transport.rank();
    let local_rows = partition.local_rows(rank);

    if rank != COORDINATOR {
        for local in 1..=local_rows {
            transport.isend(COORDINATOR, Tag::Gather, grid.interior_row(local).to_vec())?;
        }
        metrics.record_gather_rows(local_rows);
        tracing::debug!(rank, rows = local_rows, "Sent rows to coordinator");
        return Ok(None);
    }

    let mut board = Board::new(partition.size())?;
    for (local, global) in partition.range(COORDINATOR).enumerate() {
        board.set_row(global - 1, grid.interior_row(local + 1))?;
    }

    for peer in 1..partition.workers() {
        for global in partition.range(peer) {
            let row = transport
                .recv(peer, Tag::Gather)
                .await
                .map_err(|e| e.with_context(format!("gathering row {global}")))?;
            if row.len() != partition.size() {
                return Err(CommError::PayloadLength {
                    peer,
                    expected: partition.size(),
                    actual: row.len(),
                });
            }
            board.set_row(global - 1, &row)?;
        }
    }

    tracing::debug!(size = partition.size(), "Board gathered");
    Ok(Some(board))
}
