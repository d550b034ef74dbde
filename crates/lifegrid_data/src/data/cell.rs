/// State of a single cell. Only [`ALIVE`] and [`DEAD`] are valid values; the
/// integer representation is what travels between workers.
pub type Cell = u8;

pub const ALIVE: Cell = 1;
pub const DEAD: Cell = 0;

/// Glyphs used when rendering a board as text.
pub const ALIVE_CHAR: char = '▉';
pub const DEAD_CHAR: char = ' ';
