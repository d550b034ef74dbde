//! Single-worker and shared-memory runs.

use std::time::Instant;

use lifegrid_core::engine::{clamp_threads, ThreadClamp};
use lifegrid_core::{AppConfig, MetricsSnapshot, Simulation};

use crate::app::cli::Variant;
use crate::app::report::{RunOutcome, RunReport};

/// Runs the whole board in this process with `threads` step threads.
///
/// Thread requests above `max_threads` or above the board size are lowered
/// with a warning.
pub fn run_local(config: &AppConfig, variant: Variant, threads: usize) -> anyhow::Result<RunOutcome> {
    let setup_start = Instant::now();
    let size = config.grid.size;

    let (threads, clamps) = clamp_threads(threads, size, config.cluster.max_threads);
    for clamp in clamps {
        match clamp {
            ThreadClamp::Ceiling { requested, limit } => {
                tracing::warn!(requested, limit, "Thread count above ceiling, clamping");
            }
            ThreadClamp::Rows { requested, rows } => {
                tracing::warn!(requested, rows, "More threads than rows, clamping");
            }
        }
    }

    let mut sim = Simulation::from_config(config)?.with_threads(threads)?;
    let setup = setup_start.elapsed();
    tracing::debug!(size, threads = sim.threads(), edges = sim.edges().as_str(), "Board ready");

    let compute = sim.run(config.grid.generations);
    let board = sim.board()?;

    let report = RunReport {
        variant,
        size,
        generations: sim.generation(),
        edges: sim.edges(),
        workers: 1,
        threads: sim.threads(),
        setup,
        compute,
        alive: board.alive_count(),
        digest: board.digest(),
        metrics: MetricsSnapshot {
            generations: sim.generation(),
            ..MetricsSnapshot::default()
        },
    };
    Ok(RunOutcome { report, board })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threads_clamped_to_rows() {
        let mut config = AppConfig::default();
        config.grid.size = 6;
        config.grid.generations = 2;
        let outcome = run_local(&config, Variant::Threaded { threads: 50 }, 50).unwrap();
        assert_eq!(outcome.report.threads, 6);
        assert_eq!(outcome.report.generations, 2);
    }

    #[test]
    fn test_serial_and_threaded_agree() {
        let mut config = AppConfig::default();
        config.grid.size = 24;
        config.grid.generations = 12;
        config.grid.seed = 77;

        let serial = run_local(&config, Variant::Serial, 1).unwrap();
        let threaded = run_local(&config, Variant::Threaded { threads: 5 }, 5).unwrap();
        assert_eq!(serial.board, threaded.board);
        assert_eq!(serial.report.digest, threaded.report.digest);
    }
}
