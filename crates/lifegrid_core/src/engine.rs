//! Single-worker and shared-memory simulations.
//!
//! One process owns the whole board. The padding ring is refreshed from the
//! chosen [`EdgePolicy`] before each step, then the [`Stepper`] writes the
//! next generation into the back buffer and the two buffers swap.

use std::time::{Duration, Instant};

use lifegrid_data::{Board, Grid, GridError};

use crate::config::AppConfig;
use crate::edge::{refresh_border, EdgePolicy};
use crate::seed::Seed;
use crate::step::Stepper;

/// Why a requested thread count was lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadClamp {
    /// Above the hard ceiling.
    Ceiling { requested: usize, limit: usize },
    /// More threads than board rows.
    Rows { requested: usize, rows: usize },
}

/// Clamps a thread request to `max_threads` and then to the row count.
pub fn clamp_threads(requested: usize, rows: usize, max_threads: usize) -> (usize, Vec<ThreadClamp>) {
    let mut notes = Vec::new();
    let mut threads = requested.max(1);
    if threads > max_threads {
        notes.push(ThreadClamp::Ceiling {
            requested: threads,
            limit: max_threads,
        });
        threads = max_threads;
    }
    if threads > rows {
        notes.push(ThreadClamp::Rows {
            requested: threads,
            rows,
        });
        threads = rows;
    }
    (threads, notes)
}

pub struct Simulation {
    current: Grid,
    next: Grid,
    edges: EdgePolicy,
    stepper: Stepper,
    generation: u64,
}

impl Simulation {
    /// Single-threaded simulation of a `size x size` board.
    pub fn new(size: usize, seed: &Seed, edges: EdgePolicy) -> Result<Self, GridError> {
        let current = seed.full_grid(size)?;
        let next = Grid::padded(size, size)?;
        Ok(Self {
            current,
            next,
            edges,
            stepper: Stepper::serial(),
            generation: 0,
        })
    }

    /// Switches to a shared-memory fan-out over `threads` threads. The count
    /// should already be clamped with [`clamp_threads`].
    pub fn with_threads(mut self, threads: usize) -> anyhow::Result<Self> {
        self.stepper = Stepper::threaded(self.size(), threads)?;
        Ok(self)
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let seed = Seed::from_config(&config.grid)?;
        Ok(Self::new(config.grid.size, &seed, config.grid.edges)?)
    }

    pub fn size(&self) -> usize {
        self.current.interior_cols()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn threads(&self) -> usize {
        self.stepper.threads()
    }

    pub fn edges(&self) -> EdgePolicy {
        self.edges
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    /// Advances one generation.
    pub fn step(&mut self) {
        refresh_border(&mut self.current, self.edges);
        self.stepper.step(&self.current, &mut self.next);
        std::mem::swap(&mut self.current, &mut self.next);
        self.generation += 1;
        tracing::trace!(generation = self.generation, "Generation complete");
    }

    /// Advances `generations` generations and returns the time spent.
    pub fn run(&mut self, generations: u64) -> Duration {
        let start = Instant::now();
        for _ in 0..generations {
            self.step();
        }
        start.elapsed()
    }

    pub fn alive_count(&self) -> u64 {
        self.current.alive_count()
    }

    pub fn board(&self) -> Result<Board, GridError> {
        Board::from_grid(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLIDER: [(usize, usize); 5] = [(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)];

    #[test]
    fn test_clamp_threads() {
        assert_eq!(clamp_threads(4, 10, 200), (4, vec![]));
        assert_eq!(
            clamp_threads(300, 1000, 200),
            (
                200,
                vec![ThreadClamp::Ceiling {
                    requested: 300,
                    limit: 200
                }]
            )
        );
        let (threads, notes) = clamp_threads(300, 16, 200);
        assert_eq!(threads, 16);
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_empty_board_stays_empty() {
        for edges in [EdgePolicy::Toroidal, EdgePolicy::Bounded] {
            let mut sim = Simulation::new(12, &Seed::Empty, edges).unwrap();
            sim.run(25);
            assert_eq!(sim.alive_count(), 0);
            assert_eq!(sim.generation(), 25);
        }
    }

    #[test]
    fn test_glider_wraps_on_torus() {
        // Period 4, moves (+1, +1); after 4 * 6 generations on a 6x6 torus it is home.
        let mut sim = Simulation::new(6, &Seed::Cells(GLIDER.to_vec()), EdgePolicy::Toroidal).unwrap();
        let start = sim.board().unwrap().live_cells();
        sim.run(24);
        assert_eq!(sim.board().unwrap().live_cells(), start);
    }

    #[test]
    fn test_glider_dies_into_bounded_corner() {
        let mut sim = Simulation::new(6, &Seed::Cells(GLIDER.to_vec()), EdgePolicy::Bounded).unwrap();
        sim.run(24);
        // Runs into the corner and settles as a block.
        assert_eq!(sim.board().unwrap().live_cells(), vec![(4, 4), (4, 5), (5, 4), (5, 5)]);
    }

    #[test]
    fn test_threaded_matches_single_threaded() {
        let seed = Seed::Random {
            seed: 3,
            density: 0.4,
        };
        let mut single = Simulation::new(31, &seed, EdgePolicy::Toroidal).unwrap();
        let mut threaded = Simulation::new(31, &seed, EdgePolicy::Toroidal)
            .unwrap()
            .with_threads(4)
            .unwrap();
        assert_eq!(threaded.threads(), 4);

        single.run(10);
        threaded.run(10);
        assert_eq!(single.board().unwrap(), threaded.board().unwrap());
    }
}
