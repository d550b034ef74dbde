//! Configuration management for simulation runs.
//!
//! Strongly-typed structures mapping to `lifegrid.toml`. Values resolve in
//! this order:
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. The TOML file, when present
//! 3. Command-line arguments
//!
//! ## Example `lifegrid.toml`
//!
//! ```toml
//! [grid]
//! size = 512
//! generations = 100
//! seed = 7
//!
//! [cluster]
//! workers = 4
//! threads_per_worker = 2
//!
//! [output]
//! print_board = false
//! log_level = "info"
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::edge::EdgePolicy;

/// Hard ceiling on shared-memory threads.
pub const MAX_THREADS: usize = 200;

/// Largest board side accepted by validation.
pub const MAX_GRID_SIZE: usize = 65_536;

/// Board dimensions, length of the run, and initial contents.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub size: usize,
    pub generations: u64,
    pub seed: u64,
    /// Probability of a random cell starting alive.
    pub density: f64,
    /// Named pattern to seed instead of random cells.
    pub pattern: Option<String>,
    /// Edge policy for the single-worker and shared-memory variants.
    pub edges: EdgePolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 64,
            generations: 100,
            seed: 0,
            density: 0.5,
            pattern: None,
            edges: EdgePolicy::Toroidal,
        }
    }
}

/// Worker and thread layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClusterConfig {
    pub workers: usize,
    pub threads_per_worker: usize,
    pub max_threads: usize,
    /// Upper bound on cells per grid buffer. Allocations above it fail as if
    /// memory were exhausted.
    pub max_grid_cells: Option<usize>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            threads_per_worker: 1,
            max_threads: MAX_THREADS,
            max_grid_cells: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub print_board: bool,
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            print_board: false,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub grid: GridConfig,
    pub cluster: ClusterConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// # Validation Rules
    /// - Board size in `[1, MAX_GRID_SIZE]`, at least one generation
    /// - Density in `[0.0, 1.0]`, pattern names must exist
    /// - `1 <= workers <= size`, and every worker must own a row
    /// - Thread counts positive, `max_threads <= MAX_THREADS`
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.grid.size > 0, "Grid size must be positive");
        anyhow::ensure!(
            self.grid.size <= MAX_GRID_SIZE,
            "Grid size too large (max {MAX_GRID_SIZE})"
        );
        anyhow::ensure!(
            self.grid.generations > 0,
            "Generation count must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.grid.density),
            "Density must be in [0.0, 1.0]"
        );
        if let Some(name) = &self.grid.pattern {
            anyhow::ensure!(
                lifegrid_data::Pattern::by_name(name).is_some(),
                "Unknown pattern '{name}'"
            );
        }

        anyhow::ensure!(self.cluster.workers > 0, "Worker count must be positive");
        anyhow::ensure!(
            self.cluster.workers <= self.grid.size,
            "Worker count {} exceeds grid size {}",
            self.cluster.workers,
            self.grid.size
        );
        let plan = lifegrid_data::Partition::new(self.grid.size, self.cluster.workers)?;
        if let Some(rank) = plan.first_empty_worker() {
            anyhow::bail!(
                "Worker {rank} would own no rows when splitting {} rows across {} workers",
                self.grid.size,
                self.cluster.workers
            );
        }

        anyhow::ensure!(
            self.cluster.threads_per_worker > 0,
            "Threads per worker must be positive"
        );
        anyhow::ensure!(
            self.cluster.max_threads > 0 && self.cluster.max_threads <= MAX_THREADS,
            "Max threads must be in [1, {MAX_THREADS}]"
        );
        if let Some(limit) = self.cluster.max_grid_cells {
            anyhow::ensure!(limit > 0, "Grid cell limit must be positive");
        }
        Ok(())
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or returns the defaults when the file does not exist.
    ///
    /// The result is not validated: command-line overrides are applied on
    /// top before validation.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str::<Self>(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Digest of the fields that determine simulation results.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.grid).as_bytes());
        hasher.update(self.cluster.workers.to_le_bytes());
        hex::encode(hasher.finalize())
    }
}
