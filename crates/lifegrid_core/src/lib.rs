//! # Lifegrid Core
//!
//! The simulation engine for Lifegrid, Conway's Game of Life over a square
//! board that may be split across cooperating workers.
//!
//! This crate contains everything that runs inside a single worker:
//! - The B3/S23 rule and the stencil kernel over a padded grid
//! - Row-band fan-out of a step across a rayon pool
//! - Edge policies (toroidal wraparound or dead borders)
//! - Deterministic seeding shared by every decomposition
//! - Configuration, run metrics, and logging setup
//!
//! ## Example
//!
//! ```
//! use lifegrid_core::edge::EdgePolicy;
//! use lifegrid_core::engine::Simulation;
//! use lifegrid_core::seed::Seed;
//!
//! let seed = Seed::Cells(vec![(1, 0), (1, 1), (1, 2)]);
//! let mut sim = Simulation::new(5, &seed, EdgePolicy::Bounded).unwrap();
//! sim.run(2);
//! assert_eq!(sim.alive_count(), 3);
//! ```

/// Configuration management for run parameters
pub mod config;
/// Edge policies and padding refresh
pub mod edge;
/// Single-worker and shared-memory simulations
pub mod engine;
/// Run metrics collection and logging
pub mod metrics;
/// The per-cell update rule
pub mod rule;
/// Deterministic board seeding
pub mod seed;
/// Local Step Engine and row-band fan-out
pub mod step;

pub use config::AppConfig;
pub use edge::EdgePolicy;
pub use engine::Simulation;
pub use metrics::{init_logging, MetricsSnapshot, RunMetrics};
pub use seed::Seed;
pub use step::Stepper;
