//! Grid geometry for the dispatcher.
//!
//! Vehicles move one cell per time step along rows or columns, so travel time
//! between two cells is their Manhattan distance.

use serde::{Deserialize, Serialize};

/// Discrete time step. Also used for distances, which equal travel time.
pub type Time = i64;

/// A cell on the city grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Steps needed to drive from `self` to `other`.
    pub fn manhattan(self, other: Point) -> Time {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}
