//! Core data structures for the Lifegrid simulation.

pub mod board;
pub mod cell;
pub mod grid;
pub mod partition;
pub mod pattern;
