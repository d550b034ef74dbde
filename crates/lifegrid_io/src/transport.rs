//! Point-to-point tagged messaging between workers.
//!
//! The [`Transport`] trait is the seam every distributed operation goes
//! through. Sends never block; receives are split into posting a
//! [`RecvRequest`] and awaiting it, so callers can post every receive and
//! send of a round before waiting on any of them.
//!
//! [`ChannelMesh`] implements the seam in-process: one unbounded tokio
//! channel per ordered pair of workers. Messages between a pair arrive in
//! the order they were sent. A receive for one tag stashes messages carrying
//! other tags until someone asks for them.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use lifegrid_data::Cell;
use tokio::sync::{mpsc, Mutex};

use crate::error::{CommError, Result};

/// Logical channel of a message. Values never collide across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Initial distribution of a file-seeded board. Reserved.
    Initialize = 1,
    /// Boundary-row exchange between neighbours.
    Exchange = 2,
    /// Final rows sent to the coordinating worker.
    Gather = 3,
    /// Status codes for collective agreement.
    Status = 4,
    /// Collective abort; payload is the exit code.
    Abort = 5,
}

#[async_trait]
pub trait Transport: Send + Sync {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Queues `payload` for `dest` and returns immediately.
    fn isend(&self, dest: usize, tag: Tag, payload: Vec<Cell>) -> Result<()>;

    /// Posts a receive for the next `tag` message from `source`.
    ///
    /// At most one receive per source may be outstanding at a time.
    fn irecv(&self, source: usize, tag: Tag) -> Result<RecvRequest>;

    /// Blocking receive: post and wait.
    async fn recv(&self, source: usize, tag: Tag) -> Result<Vec<Cell>> {
        self.irecv(source, tag)?.wait().await
    }
}

/// An outstanding receive.
pub struct RecvRequest {
    source: usize,
    tag: Tag,
    inner: BoxFuture<'static, Result<Vec<Cell>>>,
}

impl RecvRequest {
    pub fn source(&self) -> usize {
        self.source
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub async fn wait(self) -> Result<Vec<Cell>> {
        self.inner.await
    }
}

impl fmt::Debug for RecvRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecvRequest")
            .field("source", &self.source)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Envelope {
    tag: Tag,
    payload: Vec<Cell>,
}

/// Everything received from one peer.
struct Inbox {
    peer: usize,
    rx: mpsc::UnboundedReceiver<Envelope>,
    stash: HashMap<Tag, VecDeque<Vec<Cell>>>,
    aborted: Option<u8>,
}

impl Inbox {
    async fn take(&mut self, tag: Tag) -> Result<Vec<Cell>> {
        if let Some(code) = self.aborted {
            return Err(CommError::Aborted {
                origin: self.peer,
                code,
            });
        }
        if let Some(payload) = self.stash.get_mut(&tag).and_then(VecDeque::pop_front) {
            return Ok(payload);
        }
        loop {
            let Some(envelope) = self.rx.recv().await else {
                return Err(CommError::Disconnected {
                    peer: self.peer,
                    tag,
                });
            };
            if envelope.tag == Tag::Abort {
                let code = envelope.payload.first().copied().unwrap_or(1);
                self.aborted = Some(code);
                return Err(CommError::Aborted {
                    origin: self.peer,
                    code,
                });
            }
            if envelope.tag == tag {
                return Ok(envelope.payload);
            }
            self.stash
                .entry(envelope.tag)
                .or_default()
                .push_back(envelope.payload);
        }
    }
}

/// One worker's view of a [`ChannelMesh`].
pub struct ChannelEndpoint {
    rank: usize,
    size: usize,
    outboxes: Vec<Option<mpsc::UnboundedSender<Envelope>>>,
    inboxes: Vec<Option<Arc<Mutex<Inbox>>>>,
}

impl ChannelEndpoint {
    fn check_peer(&self, peer: usize) -> Result<()> {
        if peer >= self.size || peer == self.rank {
            return Err(CommError::InvalidRank {
                rank: peer,
                size: self.size,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ChannelEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelEndpoint")
            .field("rank", &self.rank)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for ChannelEndpoint {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn isend(&self, dest: usize, tag: Tag, payload: Vec<Cell>) -> Result<()> {
        self.check_peer(dest)?;
        let Some(outbox) = &self.outboxes[dest] else {
            return Err(CommError::InvalidRank {
                rank: dest,
                size: self.size,
            });
        };
        outbox
            .send(Envelope { tag, payload })
            .map_err(|_| CommError::Disconnected { peer: dest, tag })
    }

    fn irecv(&self, source: usize, tag: Tag) -> Result<RecvRequest> {
        self.check_peer(source)?;
        let Some(inbox) = &self.inboxes[source] else {
            return Err(CommError::InvalidRank {
                rank: source,
                size: self.size,
            });
        };
        let inbox = Arc::clone(inbox);
        Ok(RecvRequest {
            source,
            tag,
            inner: Box::pin(async move { inbox.lock().await.take(tag).await }),
        })
    }
}

/// Fully connected in-process mesh of `size` endpoints.
pub struct ChannelMesh {
    endpoints: Vec<ChannelEndpoint>,
}

impl ChannelMesh {
    pub fn new(size: usize) -> Self {
        let mut endpoints: Vec<ChannelEndpoint> = (0..size)
            .map(|rank| ChannelEndpoint {
                rank,
                size,
                outboxes: (0..size).map(|_| None).collect(),
                inboxes: (0..size).map(|_| None).collect(),
            })
            .collect();

        for src in 0..size {
            for dst in 0..size {
                if src == dst {
                    continue;
                }
                let (tx, rx) = mpsc::unbounded_channel();
                endpoints[src].outboxes[dst] = Some(tx);
                endpoints[dst].inboxes[src] = Some(Arc::new(Mutex::new(Inbox {
                    peer: src,
                    rx,
                    stash: HashMap::new(),
                    aborted: None,
                })));
            }
        }
        Self { endpoints }
    }

    pub fn size(&self) -> usize {
        self.endpoints.len()
    }

    /// Endpoints in rank order.
    pub fn into_endpoints(self) -> Vec<ChannelEndpoint> {
        self.endpoints
    }
}
