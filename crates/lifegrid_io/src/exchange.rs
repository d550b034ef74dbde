//! Two-phase halo exchange.
//!
//! Worker `r` owns a contiguous band of rows and needs one row of context on
//! each side before it can step. [`HaloExchange::post`] starts every receive
//! and send of a round without waiting; [`PendingExchange::complete`] waits
//! for the receives and writes them into the halo rows. The boundary workers
//! have a single neighbour, and their outer halo row stays dead.

use lifegrid_data::{Cell, Grid, GridError};

use crate::error::{CommError, Result};
use crate::transport::{RecvRequest, Tag, Transport};

/// Row-adjacent workers of a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub above: Option<usize>,
    pub below: Option<usize>,
}

impl Neighbors {
    pub fn of(rank: usize, size: usize) -> Self {
        Self {
            above: rank.checked_sub(1),
            below: (rank + 1 < size).then_some(rank + 1),
        }
    }

    pub fn count(&self) -> usize {
        usize::from(self.above.is_some()) + usize::from(self.below.is_some())
    }
}

pub struct HaloExchange<'a, T: Transport + ?Sized> {
    transport: &'a T,
    neighbors: Neighbors,
}

impl<'a, T: Transport + ?Sized> HaloExchange<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            neighbors: Neighbors::of(transport.rank(), transport.size()),
        }
    }

    pub fn neighbors(&self) -> Neighbors {
        self.neighbors
    }

    /// Posts the receives for both halo rows, then sends the first interior
    /// row up and the last interior row down. Returns without waiting.
    pub fn post(&self, grid: &Grid) -> Result<PendingExchange> {
        let above = self
            .neighbors
            .above
            .map(|peer| self.transport.irecv(peer, Tag::Exchange))
            .transpose()?;
        let below = self
            .neighbors
            .below
            .map(|peer| self.transport.irecv(peer, Tag::Exchange))
            .transpose()?;

        let mut sent = 0;
        if let Some(peer) = self.neighbors.above {
            self.transport
                .isend(peer, Tag::Exchange, grid.interior_row(1).to_vec())?;
            sent += 1;
        }
        if let Some(peer) = self.neighbors.below {
            let last = grid.interior_rows();
            self.transport
                .isend(peer, Tag::Exchange, grid.interior_row(last).to_vec())?;
            sent += 1;
        }

        Ok(PendingExchange { above, below, sent })
    }
}

/// Receives posted by [`HaloExchange::post`] that have not been waited on.
#[derive(Debug)]
#[must_use = "halo rows are only written by `complete`"]
pub struct PendingExchange {
    above: Option<RecvRequest>,
    below: Option<RecvRequest>,
    sent: usize,
}

impl PendingExchange {
    /// Waits for both halo rows and stores them in row `0` and row
    /// `interior_rows + 1`. Returns `(rows_sent, rows_received)`.
    pub async fn complete(self, grid: &mut Grid) -> Result<(usize, usize)> {
        let mut received = 0;
        if let Some(request) = self.above {
            let peer = request.source();
            let row = request.wait().await?;
            store_halo(grid, 0, peer, &row)?;
            received += 1;
        }
        if let Some(request) = self.below {
            let peer = request.source();
            let row = request.wait().await?;
            let last = grid.rows() - 1;
            store_halo(grid, last, peer, &row)?;
            received += 1;
        }
        Ok((self.sent, received))
    }
}

fn store_halo(grid: &mut Grid, row: usize, peer: usize, values: &[Cell]) -> Result<()> {
    grid.set_interior_row(row, values).map_err(|err| match err {
        GridError::RowLength { expected, actual } => CommError::PayloadLength {
            peer,
            expected,
            actual,
        },
        other => CommError::Grid(other),
    })
}
