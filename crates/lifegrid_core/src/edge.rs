//! Edge policies: what a cell on the board's rim sees beyond the edge.
//!
//! Both policies are expressed as a refresh of the grid's padding ring, so
//! the step kernel itself never branches on edges.

use lifegrid_data::Grid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// The board wraps around on both axes.
    #[default]
    Toroidal,
    /// Nothing lives beyond the edge; the padding ring stays dead.
    Bounded,
}

impl EdgePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgePolicy::Toroidal => "toroidal",
            EdgePolicy::Bounded => "bounded",
        }
    }
}

/// Rewrites the padding ring of a grid that holds the *whole* board.
///
/// `Toroidal` copies the opposite interior edge into each halo row, then the
/// opposite column into each border column. Copying rows first makes the
/// corners pick up the diagonally opposite interior cell.
pub fn refresh_border(grid: &mut Grid, policy: EdgePolicy) {
    match policy {
        EdgePolicy::Bounded => grid.clear_border(),
        EdgePolicy::Toroidal => wrap_border(grid),
    }
}

fn wrap_border(grid: &mut Grid) {
    let rows = grid.interior_rows();
    let cols = grid.interior_cols();
    if rows == 0 || cols == 0 {
        return;
    }
    let width = grid.cols();
    let cells = grid.as_mut_slice();

    cells.copy_within(rows * width..(rows + 1) * width, 0);
    cells.copy_within(width..2 * width, (rows + 1) * width);

    for r in 0..rows + 2 {
        let start = r * width;
        cells[start] = cells[start + cols];
        cells[start + cols + 1] = cells[start + 1];
    }
}
