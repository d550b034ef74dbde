//! Collective failure agreement.
//!
//! A failure on one worker must not leave the others blocked in a receive.
//! Every worker reports a status code at the same point of the run; the
//! coordinator reduces them to the maximum and broadcasts the result, so
//! all workers continue or all of them stop. For failures that happen
//! outside such a point, [`abort`] interrupts any receive a peer has
//! pending from this worker.

use lifegrid_data::Cell;

use crate::error::{CommError, Result};
use crate::gather::COORDINATOR;
use crate::transport::{Tag, Transport};

pub const STATUS_OK: u8 = 0;
pub const STATUS_FAILED: u8 = 1;
pub const STATUS_ALLOCATION: u8 = 2;

/// A status code and the worker that reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub code: u8,
    pub origin: usize,
}

impl Verdict {
    fn encode(self) -> Vec<Cell> {
        let mut payload = Vec::with_capacity(9);
        payload.push(self.code);
        payload.extend_from_slice(&(self.origin as u64).to_le_bytes());
        payload
    }

    fn decode(peer: usize, payload: &[Cell]) -> Result<Self> {
        let malformed = || CommError::PayloadLength {
            peer,
            expected: 9,
            actual: payload.len(),
        };
        let (&code, rest) = payload.split_first().ok_or_else(malformed)?;
        let origin: [u8; 8] = rest.try_into().map_err(|_| malformed())?;
        Ok(Self {
            code,
            origin: u64::from_le_bytes(origin) as usize,
        })
    }

    /// Higher code wins; ties go to the lowest rank.
    fn max(self, other: Self) -> Self {
        match self.code.cmp(&other.code) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Equal if other.origin < self.origin => other,
            std::cmp::Ordering::Equal => self,
        }
    }
}

/// Reduces `code` across all workers to the maximum and returns it to
/// everyone. Every worker must call this the same number of times.
pub async fn all_reduce_max<T: Transport + ?Sized>(transport: &T, code: u8) -> Result<Verdict> {
    let rank = transport.rank();
    let local = Verdict { code, origin: rank };

    if transport.size() == 1 {
        return Ok(local);
    }

    if rank != COORDINATOR {
        transport.isend(COORDINATOR, Tag::Status, local.encode())?;
        let payload = transport.recv(COORDINATOR, Tag::Status).await?;
        return Verdict::decode(COORDINATOR, &payload);
    }

    let mut verdict = local;
    for peer in 1..transport.size() {
        let payload = transport.recv(peer, Tag::Status).await?;
        verdict = verdict.max(Verdict::decode(peer, &payload)?);
    }
    for peer in 1..transport.size() {
        transport.isend(peer, Tag::Status, verdict.encode())?;
    }
    Ok(verdict)
}

/// Agrees on whether the run continues. Fails on every worker with
/// [`CommError::Aborted`] if any worker reported a non-zero code.
pub async fn agree<T: Transport + ?Sized>(transport: &T, code: u8) -> Result<()> {
    let verdict = all_reduce_max(transport, code).await?;
    if verdict.code == STATUS_OK {
        return Ok(());
    }
    tracing::debug!(
        rank = transport.rank(),
        origin = verdict.origin,
        code = verdict.code,
        "Collective agreement failed"
    );
    Err(CommError::Aborted {
        origin: verdict.origin,
        code: verdict.code,
    })
}

/// Tells every peer to stop. Peers that are already gone are skipped.
pub fn abort<T: Transport + ?Sized>(transport: &T, code: u8) {
    let rank = transport.rank();
    tracing::warn!(rank, code, "Aborting run");
    for peer in (0..transport.size()).filter(|&p| p != rank) {
        if let Err(e) = transport.isend(peer, Tag::Abort, vec![code]) {
            tracing::debug!(rank, peer, error = %e, "Abort not delivered");
        }
    }
}
