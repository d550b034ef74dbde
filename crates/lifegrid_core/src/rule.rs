use lifegrid_data::{Cell, ALIVE, DEAD};

/// Conway's B3/S23 rule for one cell.
///
/// A live cell with two or three live neighbours survives, a dead cell with
/// exactly three becomes alive, everything else is dead.
#[inline(always)]
pub fn next_state(current: Cell, live_neighbors: u8) -> Cell {
    match (current == ALIVE, live_neighbors) {
        (true, 2) | (true, 3) => ALIVE,
        (false, 3) => ALIVE,
        _ => DEAD,
    }
}
