//! # Lifegrid Data
//!
//! Plain data shared by every layer of the simulation:
//! - `Cell` states and the `ALIVE`/`DEAD` constants
//! - `Grid`, the padded double-buffer storage a worker steps over
//! - `Partition`, the pure row-ownership arithmetic of a decomposition
//! - `Board`, the unpadded global board assembled at the end of a run
//! - `Pattern`, named seed shapes

pub mod data;
pub mod error;

pub use data::board::Board;
pub use data::cell::{Cell, ALIVE, ALIVE_CHAR, DEAD, DEAD_CHAR};
pub use data::grid::Grid;
pub use data::partition::Partition;
pub use data::pattern::{Pattern, PATTERNS};
pub use error::GridError;
