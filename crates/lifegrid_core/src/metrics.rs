//! Run metrics and logging setup.
//!
//! Each worker owns a [`RunMetrics`]; counters are atomics so the exchange
//! and gather layers can record through a shared reference. Snapshots from
//! all workers are summed into the final report.

use std::ops::Add;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub struct RunMetrics {
    generations: AtomicU64,
    halo_rows_sent: AtomicU64,
    halo_rows_received: AtomicU64,
    gather_rows: AtomicU64,
    start_time: Instant,
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RunMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generations: AtomicU64::new(0),
            halo_rows_sent: AtomicU64::new(0),
            halo_rows_received: AtomicU64::new(0),
            gather_rows: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a completed generation.
    pub fn record_generation(&self, rank: usize, duration: Duration) {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(
            rank,
            generation,
            duration_us = duration.as_micros() as u64,
            "Generation complete"
        );
        if generation.is_multiple_of(1000) {
            tracing::debug!(rank, generation, "Progress");
        }
    }

    pub fn record_halo(&self, sent: usize, received: usize) {
        self.halo_rows_sent.fetch_add(sent as u64, Ordering::Relaxed);
        self.halo_rows_received
            .fetch_add(received as u64, Ordering::Relaxed);
    }

    pub fn record_gather_rows(&self, rows: usize) {
        self.gather_rows.fetch_add(rows as u64, Ordering::Relaxed);
    }

    #[must_use]
    pub fn generations(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            generations: self.generations.load(Ordering::Relaxed),
            halo_rows_sent: self.halo_rows_sent.load(Ordering::Relaxed),
            halo_rows_received: self.halo_rows_received.load(Ordering::Relaxed),
            gather_rows: self.gather_rows.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of a worker's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub generations: u64,
    pub halo_rows_sent: u64,
    pub halo_rows_received: u64,
    pub gather_rows: u64,
}

impl Add for MetricsSnapshot {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            generations: self.generations.max(other.generations),
            halo_rows_sent: self.halo_rows_sent + other.halo_rows_sent,
            halo_rows_received: self.halo_rows_received + other.halo_rows_received,
            gather_rows: self.gather_rows + other.gather_rows,
        }
    }
}

/// Installs a stderr fmt subscriber. `RUST_LOG` overrides `directive`.
/// Calling it more than once is harmless.
pub fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .ok();
}
