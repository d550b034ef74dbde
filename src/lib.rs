//! Conway's Game of Life over a square board, run on one thread, on a
//! shared-memory thread pool, or split by rows across message-passing
//! workers.

pub mod app;
