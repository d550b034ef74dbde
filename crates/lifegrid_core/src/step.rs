//! Local Step Engine: one generation over the interior of a padded grid.
//!
//! The source grid is read-only for the whole step and only interior cells
//! of the destination are written, so a step can fan out across threads as
//! long as each thread owns a disjoint band of destination rows.

use std::ops::Range;

use lifegrid_data::{Cell, Grid};
use rayon::prelude::*;

use crate::rule::next_state;

/// Advances every interior cell of `src` into `dst`.
///
/// `dst` must have the same dimensions as `src`. Its padding ring is left
/// untouched.
pub fn step(src: &Grid, dst: &mut Grid) {
    debug_assert_eq!((src.rows(), src.cols()), (dst.rows(), dst.cols()));
    let interior = 1..src.interior_rows() + 1;
    let width = src.cols();
    let out = &mut dst.as_mut_slice()[interior.start * width..interior.end * width];
    step_band(src, interior, out);
}

/// Splits `rows` interior rows into `threads` contiguous bands of padded
/// row indices. Every band gets `rows / threads` rows and the first band
/// absorbs the whole remainder.
pub fn plan_bands(rows: usize, threads: usize) -> Vec<Range<usize>> {
    let threads = threads.clamp(1, rows.max(1));
    let base = rows / threads;
    let extra = rows - base * threads;

    let mut bands = Vec::with_capacity(threads);
    let mut start = 1;
    for t in 0..threads {
        let len = if t == 0 { base + extra } else { base };
        bands.push(start..start + len);
        start += len;
    }
    bands
}

/// Runs the step kernel over disjoint destination bands on a rayon pool.
///
/// `bands` must be contiguous, ascending, and cover the interior exactly
/// once, as produced by [`plan_bands`].
pub fn step_banded(src: &Grid, dst: &mut Grid, bands: &[Range<usize>], pool: &rayon::ThreadPool) {
    debug_assert_eq!((src.rows(), src.cols()), (dst.rows(), dst.cols()));
    let width = src.cols();

    let mut chunks: Vec<(Range<usize>, &mut [Cell])> = Vec::with_capacity(bands.len());
    let (_, mut rest) = dst.as_mut_slice().split_at_mut(width);
    for band in bands {
        let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(band.len() * width);
        chunks.push((band.clone(), chunk));
        rest = tail;
    }

    pool.install(|| {
        chunks
            .into_par_iter()
            .for_each(|(band, out)| step_band(src, band, out));
    });
}

/// Kernel for padded rows `rows` of `src`; `out` holds exactly those rows of
/// the destination.
#[inline]
fn step_band(src: &Grid, rows: Range<usize>, out: &mut [Cell]) {
    let width = src.cols();
    let cells = src.as_slice();

    for (k, i) in rows.enumerate() {
        let up = &cells[(i - 1) * width..i * width];
        let mid = &cells[i * width..(i + 1) * width];
        let down = &cells[(i + 1) * width..(i + 2) * width];
        let dst = &mut out[k * width..(k + 1) * width];

        for j in 1..width - 1 {
            let live = up[j - 1]
                + up[j]
                + up[j + 1]
                + mid[j - 1]
                + mid[j + 1]
                + down[j - 1]
                + down[j]
                + down[j + 1];
            dst[j] = next_state(mid[j], live);
        }
    }
}

/// Owns the fan-out configuration for repeated steps of one grid shape.
pub struct Stepper {
    pool: Option<rayon::ThreadPool>,
    bands: Vec<Range<usize>>,
}

impl Stepper {
    /// Single-threaded stepping.
    pub fn serial() -> Self {
        Self {
            pool: None,
            bands: Vec::new(),
        }
    }

    /// Fans out over `threads` threads for grids with `rows` interior rows.
    /// One thread falls back to [`Stepper::serial`].
    pub fn threaded(rows: usize, threads: usize) -> anyhow::Result<Self> {
        let bands = plan_bands(rows, threads);
        if bands.len() <= 1 {
            return Ok(Self::serial());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(bands.len())
            .thread_name(|i| format!("lifegrid-step-{i}"))
            .build()?;
        Ok(Self {
            pool: Some(pool),
            bands,
        })
    }

    pub fn threads(&self) -> usize {
        self.bands.len().max(1)
    }

    pub fn bands(&self) -> &[Range<usize>] {
        &self.bands
    }

    pub fn step(&self, src: &Grid, dst: &mut Grid) {
        match &self.pool {
            Some(pool) => step_banded(src, dst, &self.bands, pool),
            None => step(src, dst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{refresh_border, EdgePolicy};
    use lifegrid_data::{ALIVE, DEAD};

    fn grid_with(size: usize, live: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::padded(size, size).unwrap();
        for &(r, c) in live {
            grid.set(r + 1, c + 1, ALIVE);
        }
        grid
    }

    fn live_cells(grid: &Grid) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for r in 1..=grid.interior_rows() {
            for c in 1..=grid.interior_cols() {
                if grid.get(r, c) == ALIVE {
                    out.push((r - 1, c - 1));
                }
            }
        }
        out
    }

    #[test]
    fn test_blinker_oscillates() {
        let src = grid_with(5, &[(2, 1), (2, 2), (2, 3)]);
        let mut dst = Grid::padded(5, 5).unwrap();
        step(&src, &mut dst);
        assert_eq!(live_cells(&dst), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_block_is_still_life() {
        let src = grid_with(4, &[(1, 1), (1, 2), (2, 1), (2, 2)]);
        let mut dst = Grid::padded(4, 4).unwrap();
        step(&src, &mut dst);
        assert_eq!(live_cells(&dst), live_cells(&src));
    }

    #[test]
    fn test_source_untouched_and_destination_ring_preserved() {
        let src = grid_with(3, &[(0, 0), (0, 1), (1, 0)]);
        let before = src.clone();
        let mut dst = Grid::padded(3, 3).unwrap();
        dst.set(0, 0, ALIVE);
        dst.set(4, 2, ALIVE);

        step(&src, &mut dst);

        assert_eq!(src, before);
        assert_eq!(dst.get(0, 0), ALIVE);
        assert_eq!(dst.get(4, 2), ALIVE);
        assert_eq!(dst.get(2, 2), ALIVE);
    }

    #[test]
    fn test_halo_rows_feed_the_edge() {
        // Three live halo cells above the first interior row give birth below.
        let mut src = Grid::padded(2, 3).unwrap();
        src.set_interior_row(0, &[ALIVE, ALIVE, ALIVE]).unwrap();
        let mut dst = Grid::padded(2, 3).unwrap();
        step(&src, &mut dst);
        assert_eq!(dst.interior_row(1), &[DEAD, ALIVE, DEAD]);
    }

    #[test]
    fn test_plan_bands_first_absorbs_remainder() {
        assert_eq!(plan_bands(10, 4), vec![1..5, 5..7, 7..9, 9..11]);
        assert_eq!(plan_bands(8, 4), vec![1..3, 3..5, 5..7, 7..9]);
        assert_eq!(plan_bands(3, 8), vec![1..2, 2..3, 3..4]);
        assert_eq!(plan_bands(5, 1), vec![1..6]);
    }

    #[test]
    fn test_banded_step_matches_serial() {
        let size = 23;
        let mut src = Grid::padded(size, size).unwrap();
        for r in 1..=size {
            for c in 1..=size {
                if (r * 7 + c * 3) % 5 < 2 {
                    src.set(r, c, ALIVE);
                }
            }
        }
        refresh_border(&mut src, EdgePolicy::Toroidal);

        let mut serial = Grid::padded(size, size).unwrap();
        step(&src, &mut serial);

        let stepper = Stepper::threaded(size, 4).unwrap();
        assert_eq!(stepper.threads(), 4);
        let mut banded = Grid::padded(size, size).unwrap();
        stepper.step(&src, &mut banded);

        assert_eq!(serial, banded);
    }

    #[test]
    fn test_single_thread_stepper_is_serial() {
        let stepper = Stepper::threaded(10, 1).unwrap();
        assert_eq!(stepper.threads(), 1);
        assert!(stepper.bands().is_empty());
    }
}
