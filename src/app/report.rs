//! Human-readable run summary, written to stderr at the end of a run.

use std::fmt;
use std::time::Duration;

use lifegrid_core::{EdgePolicy, MetricsSnapshot};
use lifegrid_data::Board;

use crate::app::cli::Variant;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub variant: Variant,
    pub size: usize,
    pub generations: u64,
    pub edges: EdgePolicy,
    pub workers: usize,
    /// Step threads per worker.
    pub threads: usize,
    /// Allocation and seeding ("serial" phase).
    pub setup: Duration,
    /// Exchange and step loop ("parallel" phase).
    pub compute: Duration,
    pub alive: u64,
    pub digest: String,
    pub metrics: MetricsSnapshot,
}

impl RunReport {
    pub fn total(&self) -> Duration {
        self.setup + self.compute
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board: {size}x{size}, {} generations, {} edges",
            self.generations,
            self.edges.as_str(),
            size = self.size
        )?;
        writeln!(
            f,
            "Variant: {}, workers: {}, threads per worker: {}",
            self.variant.name(),
            self.workers,
            self.threads
        )?;
        writeln!(f, "Serial time:   {:.6} s", self.setup.as_secs_f64())?;
        writeln!(f, "Parallel time: {:.6} s", self.compute.as_secs_f64())?;
        writeln!(f, "Total time:    {:.6} s", self.total().as_secs_f64())?;
        if self.workers > 1 {
            writeln!(
                f,
                "Halo rows sent/received: {}/{}, gathered rows: {}",
                self.metrics.halo_rows_sent,
                self.metrics.halo_rows_received,
                self.metrics.gather_rows
            )?;
        }
        writeln!(f, "Alive cells: {}", self.alive)?;
        write!(f, "Digest: {}", self.digest)
    }
}

/// A finished run: the summary plus the final board.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RunReport,
    pub board: Board,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(workers: usize) -> RunReport {
        RunReport {
            variant: Variant::Distributed,
            size: 8,
            generations: 3,
            edges: EdgePolicy::Bounded,
            workers,
            threads: 1,
            setup: Duration::from_millis(500),
            compute: Duration::from_millis(1500),
            alive: 5,
            digest: "ab".into(),
            metrics: MetricsSnapshot::default(),
        }
    }

    #[test]
    fn test_report_lines() {
        let text = sample(2).to_string();
        assert!(text.starts_with("Board: 8x8, 3 generations, bounded edges"));
        assert!(text.contains("Total time:    2.000000 s"));
        assert!(text.contains("Halo rows"));
        assert!(text.contains("Alive cells: 5"));
        assert!(text.ends_with("Digest: ab"));
    }

    #[test]
    fn test_single_worker_omits_traffic() {
        assert!(!sample(1).to_string().contains("Halo rows"));
    }
}
