//! Launches the workers of a distributed run.
//!
//! Each worker is a tokio task holding one endpoint of a [`ChannelMesh`].
//! The cluster waits for all of them, then folds their outputs into one
//! [`RunOutcome`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use futures::future::join_all;
use lifegrid_core::{AppConfig, EdgePolicy, MetricsSnapshot};
use lifegrid_io::ChannelMesh;
use tokio::task::JoinError;

use crate::app::cli::Variant;
use crate::app::report::{RunOutcome, RunReport};
use crate::app::worker::{is_abort, is_secondary, Worker, WorkerOutput, WorkerPlan};

pub struct Cluster {
    plan: Arc<WorkerPlan>,
}

impl Cluster {
    pub fn new(plan: WorkerPlan) -> Self {
        Self {
            plan: Arc::new(plan),
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self::new(WorkerPlan::from_config(config)?))
    }

    pub fn workers(&self) -> usize {
        self.plan.partition.workers()
    }

    /// Runs every worker to completion.
    ///
    /// Fails if any worker fails. A worker's own error is preferred over the
    /// abort notices and disconnects its peers report in response.
    pub async fn run(&self) -> anyhow::Result<RunOutcome> {
        let workers = self.workers();
        tracing::info!(
            workers,
            size = self.plan.partition.size(),
            generations = self.plan.generations,
            "Launching workers"
        );

        let handles: Vec<_> = ChannelMesh::new(workers)
            .into_endpoints()
            .into_iter()
            .map(|endpoint| tokio::spawn(Worker::new(endpoint, Arc::clone(&self.plan)).run()))
            .collect();

        self.settle(join_all(handles).await)
    }

    /// Folds the joined worker results, in rank order, into one outcome.
    fn settle(
        &self,
        results: Vec<Result<anyhow::Result<WorkerOutput>, JoinError>>,
    ) -> anyhow::Result<RunOutcome> {
        let mut outputs = Vec::with_capacity(results.len());
        let mut root_cause = None;
        let mut abort_notice = None;
        let mut disconnect = None;
        for (rank, joined) in results.into_iter().enumerate() {
            let result = joined
                .with_context(|| format!("worker {rank} panicked"))
                .and_then(|r| r.with_context(|| format!("worker {rank}")));
            match result {
                Ok(output) => outputs.push(output),
                Err(err) if is_abort(&err) => {
                    abort_notice.get_or_insert(err);
                }
                Err(err) if is_secondary(&err) => {
                    disconnect.get_or_insert(err);
                }
                Err(err) => {
                    root_cause.get_or_insert(err);
                }
            }
        }
        if let Some(err) = root_cause.or(abort_notice).or(disconnect) {
            tracing::error!(error = %format!("{err:#}"), "Distributed run aborted");
            return Err(err.context("distributed run failed"));
        }

        self.fold(outputs)
    }

    fn fold(&self, outputs: Vec<WorkerOutput>) -> anyhow::Result<RunOutcome> {
        let mut board = None;
        let mut setup = Duration::ZERO;
        let mut compute = Duration::ZERO;
        let mut threads = 1;
        let mut metrics = MetricsSnapshot::default();
        for output in outputs {
            setup = setup.max(output.setup);
            compute = compute.max(output.compute);
            threads = threads.max(output.threads);
            metrics = metrics + output.metrics;
            if output.board.is_some() {
                board = output.board;
            }
        }
        let board = board.context("coordinator returned no board")?;

        let report = RunReport {
            variant: Variant::Distributed,
            size: self.plan.partition.size(),
            generations: metrics.generations,
            edges: EdgePolicy::Bounded,
            workers: self.workers(),
            threads,
            setup,
            compute,
            alive: board.alive_count(),
            digest: board.digest(),
            metrics,
        };
        Ok(RunOutcome { report, board })
    }
}
