//! Seams between the simulation loop and ride selection.

use crate::grid::{Point, Time};
use crate::pool::RidePool;

/// Picks the ride an idle vehicle should serve next.
///
/// Implementations may keep scratch buffers or an RNG, hence `&mut self`. A
/// selector must only return rides the vehicle can finish on time.
pub trait RideSelector {
    /// Returns the pool index of the chosen ride for a vehicle at `from` at
    /// step `t`, or `None` to leave the vehicle idle this step.
    fn select(&mut self, from: Point, pool: &RidePool, t: Time) -> Option<usize>;
}

impl<S: RideSelector + ?Sized> RideSelector for Box<S> {
    fn select(&mut self, from: Point, pool: &RidePool, t: Time) -> Option<usize> {
        (**self).select(from, pool, t)
    }
}
