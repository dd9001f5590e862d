//! ride-dispatch core
//!
//! Time-stepped assignment of capacity-one vehicles to time-windowed rides on
//! a grid, with a pairwise lookahead heuristic for ride selection.

pub mod traits;
pub mod grid;
pub mod model;
pub mod scoring;
pub mod pool;
pub mod matcher;
pub mod solver;
pub mod config;
pub mod input;
pub mod output;
pub mod batch;
