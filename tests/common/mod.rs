pub mod macros;

use lifegrid_core::{AppConfig, EdgePolicy, Seed, Simulation};
use lifegrid_data::Board;
use lifegrid_lib::app::worker::WorkerPlan;
use lifegrid_lib::app::{Cluster, RunOutcome};

/// Glider heading down-right, 0-indexed `(row, col)`.
#[allow(dead_code)]
pub const GLIDER: [(usize, usize); 5] = [(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)];

#[allow(dead_code)]
pub fn shifted(cells: &[(usize, usize)], dr: usize, dc: usize) -> Vec<(usize, usize)> {
    let mut out: Vec<_> = cells.iter().map(|&(r, c)| (r + dr, c + dc)).collect();
    out.sort_unstable();
    out
}

/// Builds run configurations for integration tests.
#[allow(dead_code)]
pub struct RunBuilder {
    config: AppConfig,
    seed: Option<Seed>,
}

#[allow(dead_code)]
impl RunBuilder {
    pub fn new(size: usize, generations: u64) -> Self {
        let mut config = AppConfig::default();
        config.grid.size = size;
        config.grid.generations = generations;
        Self { config, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.grid.seed = seed;
        self
    }

    pub fn with_cells(mut self, cells: &[(usize, usize)]) -> Self {
        self.seed = Some(Seed::Cells(cells.to_vec()));
        self
    }

    pub fn empty(mut self) -> Self {
        self.seed = Some(Seed::Empty);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.cluster.workers = workers;
        self
    }

    pub fn with_threads_per_worker(mut self, threads: usize) -> Self {
        self.config.cluster.threads_per_worker = threads;
        self
    }

    pub fn with_max_grid_cells(mut self, cells: usize) -> Self {
        self.config.cluster.max_grid_cells = Some(cells);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn seed(&self) -> Seed {
        match &self.seed {
            Some(seed) => seed.clone(),
            None => Seed::from_config(&self.config.grid).expect("seed from config"),
        }
    }

    pub async fn distributed(self) -> anyhow::Result<RunOutcome> {
        self.config.validate()?;
        let mut plan = WorkerPlan::from_config(&self.config)?;
        plan.seed = self.seed();
        Cluster::new(plan).run().await
    }

    /// Single-threaded reference run.
    pub fn local(&self, edges: EdgePolicy) -> Board {
        let mut sim =
            Simulation::new(self.config.grid.size, &self.seed(), edges).expect("allocate board");
        sim.run(self.config.grid.generations);
        sim.board().expect("copy board")
    }
}
