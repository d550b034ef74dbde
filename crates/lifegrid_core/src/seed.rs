//! Deterministic initial boards.
//!
//! Every worker replays the same seed over the whole board in global
//! row-major order and keeps only the rows it owns, so the initial state is
//! identical for every decomposition of a run.

use std::ops::Range;

use lifegrid_data::{Grid, GridError, Pattern, ALIVE, DEAD};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GridConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    /// Every cell drawn from a seeded ChaCha stream.
    Random { seed: u64, density: f64 },
    /// Explicit live cells, 0-indexed `(row, col)`.
    Cells(Vec<(usize, usize)>),
    /// All cells dead.
    Empty,
}

impl Seed {
    /// Builds the seed described by a grid config: a centred pattern when
    /// one is named, random cells otherwise.
    pub fn from_config(grid: &GridConfig) -> anyhow::Result<Self> {
        match &grid.pattern {
            Some(name) => {
                let pattern = Pattern::by_name(name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown pattern '{name}'"))?;
                Ok(Seed::Cells(pattern.centered(grid.size)))
            }
            None => Ok(Seed::Random {
                seed: grid.seed,
                density: grid.density,
            }),
        }
    }

    /// Fills the interior of `grid` with the global rows `rows` (1-based,
    /// half-open) of a `size x size` board. Interior row 1 of `grid` holds
    /// global row `rows.start`.
    pub fn fill(&self, grid: &mut Grid, size: usize, rows: Range<usize>) -> Result<(), GridError> {
        if grid.interior_rows() != rows.len() || grid.interior_cols() != size {
            return Err(GridError::RowLength {
                expected: rows.len(),
                actual: grid.interior_rows(),
            });
        }
        match self {
            Seed::Random { seed, density } => {
                let mut rng = ChaCha8Rng::seed_from_u64(*seed);
                let density = density.clamp(0.0, 1.0);
                for i in 1..rows.end.min(size + 1) {
                    for j in 1..=size {
                        let alive = rng.gen_bool(density);
                        if rows.contains(&i) {
                            grid.set(i - rows.start + 1, j, if alive { ALIVE } else { DEAD });
                        }
                    }
                }
            }
            Seed::Cells(cells) => {
                for &(r, c) in cells {
                    let global = r + 1;
                    if c < size && rows.contains(&global) {
                        grid.set(global - rows.start + 1, c + 1, ALIVE);
                    }
                }
            }
            Seed::Empty => {}
        }
        Ok(())
    }

    /// Allocates and fills a padded grid for the whole board.
    pub fn full_grid(&self, size: usize) -> Result<Grid, GridError> {
        let mut grid = Grid::padded(size, size)?;
        self.fill(&mut grid, size, 1..size + 1)?;
        Ok(grid)
    }
}
