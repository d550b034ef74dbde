//! One worker of a distributed run.
//!
//! A worker owns the rows its [`Partition`] assigns to it and nothing else.
//! It moves through [`Phase`]s in a fixed order:
//! `Init -> PartitionComputed -> (Exchange -> LocalStep) x generations ->
//! Gather -> Done`, or drops to `Abort` from any of them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use lifegrid_core::engine::clamp_threads;
use lifegrid_core::{AppConfig, MetricsSnapshot, RunMetrics, Seed, Stepper};
use lifegrid_data::{Board, Grid, GridError, Partition};
use lifegrid_io::collective::{STATUS_ALLOCATION, STATUS_FAILED, STATUS_OK};
use lifegrid_io::{abort, agree, gather_board, CommError, HaloExchange, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    PartitionComputed,
    Exchange,
    LocalStep,
    Gather,
    Done,
    Abort,
}

/// Everything a worker needs to know about the run, shared by all workers.
#[derive(Debug, Clone)]
pub struct WorkerPlan {
    pub partition: Partition,
    pub generations: u64,
    pub seed: Seed,
    pub threads: usize,
    pub max_threads: usize,
    pub max_grid_cells: Option<usize>,
}

impl WorkerPlan {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let partition = Partition::new(config.grid.size, config.cluster.workers)?;
        partition.ensure_nonempty()?;
        Ok(Self {
            partition,
            generations: config.grid.generations,
            seed: Seed::from_config(&config.grid)?,
            threads: config.cluster.threads_per_worker,
            max_threads: config.cluster.max_threads,
            max_grid_cells: config.cluster.max_grid_cells,
        })
    }
}

/// What a worker hands back when it finishes.
#[derive(Debug)]
pub struct WorkerOutput {
    pub rank: usize,
    /// Only the coordinator holds the gathered board.
    pub board: Option<Board>,
    pub threads: usize,
    pub setup: Duration,
    pub compute: Duration,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, thiserror::Error)]
enum SetupError {
    #[error("allocating local grid: {0}")]
    Allocation(#[from] GridError),
    #[error("seeding local grid: {0}")]
    Seed(GridError),
    #[error("building step pool: {0:#}")]
    Pool(anyhow::Error),
}

impl SetupError {
    fn status(&self) -> u8 {
        match self {
            SetupError::Allocation(_) => STATUS_ALLOCATION,
            SetupError::Seed(_) | SetupError::Pool(_) => STATUS_FAILED,
        }
    }
}

struct Buffers {
    current: Grid,
    next: Grid,
    stepper: Stepper,
}

pub struct Worker<T: Transport> {
    transport: T,
    plan: Arc<WorkerPlan>,
    phase: Phase,
    metrics: RunMetrics,
}

impl<T: Transport + 'static> Worker<T> {
    pub fn new(transport: T, plan: Arc<WorkerPlan>) -> Self {
        Self {
            transport,
            plan,
            phase: Phase::Init,
            metrics: RunMetrics::new(),
        }
    }

    pub fn rank(&self) -> usize {
        self.transport.rank()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        if phase != self.phase {
            tracing::debug!(rank = self.rank(), from = ?self.phase, to = ?phase, "Phase change");
            self.phase = phase;
        }
    }

    /// Runs the worker to completion. A local failure is broadcast as an
    /// abort so that no peer stays blocked on this worker.
    pub async fn run(mut self) -> anyhow::Result<WorkerOutput> {
        let result = self.execute().await;
        if let Err(err) = &result {
            let rank = self.rank();
            let from = self.phase;
            self.enter(Phase::Abort);
            if is_abort(err) {
                tracing::debug!(rank, phase = ?from, "Stopping on collective abort");
            } else if is_secondary(err) {
                tracing::warn!(rank, phase = ?from, error = %format!("{err:#}"), "Peer went away");
                abort(&self.transport, STATUS_FAILED);
            } else {
                tracing::error!(rank, phase = ?from, error = %format!("{err:#}"), "Worker failed");
                abort(&self.transport, STATUS_FAILED);
            }
        }
        result
    }

    async fn execute(&mut self) -> anyhow::Result<WorkerOutput> {
        let rank = self.rank();
        let partition = self.plan.partition;
        anyhow::ensure!(
            self.transport.size() == partition.workers(),
            "Transport has {} workers, partition expects {}",
            self.transport.size(),
            partition.workers()
        );
        let setup_start = Instant::now();
        self.enter(Phase::PartitionComputed);
        tracing::debug!(
            rank,
            rows = ?partition.range(rank),
            "Partition computed"
        );

        let buffers = match self.allocate(rank) {
            Ok(buffers) => {
                agree(&self.transport, STATUS_OK).await?;
                buffers
            }
            Err(err) => {
                tracing::error!(rank, error = %err, "Setup failed");
                let status = err.status();
                agree(&self.transport, status).await?;
                return Err(CommError::Aborted { origin: rank, code: status }.into());
            }
        };
        let Buffers {
            mut current,
            mut next,
            stepper,
        } = buffers;
        let threads = stepper.threads();
        let stepper = Arc::new(stepper);
        let setup = setup_start.elapsed();

        let compute_start = Instant::now();
        for generation in 1..=self.plan.generations {
            self.enter(Phase::Exchange);
            let pending = HaloExchange::new(&self.transport).post(&current)?;
            let (sent, received) = pending
                .complete(&mut current)
                .await
                .with_context(|| format!("halo exchange for generation {generation}"))?;
            self.metrics.record_halo(sent, received);

            self.enter(Phase::LocalStep);
            let step_start = Instant::now();
            let stepper = Arc::clone(&stepper);
            (current, next) = tokio::task::spawn_blocking(move || {
                stepper.step(&current, &mut next);
                (next, current)
            })
            .await
            .context("step task failed")?;
            self.metrics.record_generation(rank, step_start.elapsed());
        }
        let compute = compute_start.elapsed();

        self.enter(Phase::Gather);
        let board = gather_board(&self.transport, &partition, &current, &self.metrics).await?;
        self.enter(Phase::Done);
        tracing::debug!(rank, generations = self.metrics.generations(), "Worker done");

        Ok(WorkerOutput {
            rank,
            board,
            threads,
            setup,
            compute,
            metrics: self.metrics.snapshot(),
        })
    }

    /// Allocates both local buffers, seeds the owned rows and builds the
    /// step pool.
    fn allocate(&self, rank: usize) -> Result<Buffers, SetupError> {
        let partition = &self.plan.partition;
        let rows = partition.local_rows(rank);
        let size = partition.size();

        let mut current = Grid::padded_within(rows, size, self.plan.max_grid_cells)?;
        let next = Grid::padded_within(rows, size, self.plan.max_grid_cells)?;
        self.plan
            .seed
            .fill(&mut current, size, partition.range(rank))
            .map_err(SetupError::Seed)?;

        let (threads, clamps) = clamp_threads(self.plan.threads, rows, self.plan.max_threads);
        for clamp in clamps {
            tracing::warn!(rank, ?clamp, "Clamped step threads");
        }
        let stepper = Stepper::threaded(rows, threads).map_err(SetupError::Pool)?;

        Ok(Buffers {
            current,
            next,
            stepper,
        })
    }
}

/// Whether an error chain bottoms out in a collective abort.
pub fn is_abort(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<CommError>().is_some_and(CommError::is_abort))
}

/// Whether an error chain only reports another worker's failure, either as
/// an abort notice or as a peer that disconnected.
pub fn is_secondary(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<CommError>()
            .is_some_and(CommError::is_secondary)
    })
}
