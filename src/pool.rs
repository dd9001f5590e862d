//! Live ride pool ordered by start deadline.

use std::collections::VecDeque;

use crate::grid::Time;
use crate::model::Ride;

/// Rides that are neither assigned nor expired.
///
/// Sorted once by `deadline_start` on construction, so expired rides always
/// form a prefix and pruning is a scan from the front. The order only changes
/// through removal.
#[derive(Debug, Clone, Default)]
pub struct RidePool {
    rides: VecDeque<Ride>,
}

impl RidePool {
    pub fn new(mut rides: Vec<Ride>) -> Self {
        // stable: input order breaks deadline ties
        rides.sort_by_key(Ride::deadline_start);
        Self {
            rides: rides.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Ride> {
        self.rides.get(index)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Ride> + '_ {
        self.rides.iter()
    }

    /// Drops every ride with `deadline_start < t` and returns them.
    pub fn prune_expired(&mut self, t: Time) -> Vec<Ride> {
        let expired = self
            .rides
            .iter()
            .take_while(|ride| ride.deadline_start() < t)
            .count();
        self.rides.drain(..expired).collect()
    }

    /// Removes the ride at `index` (as seen through [`iter`](Self::iter)).
    pub fn take(&mut self, index: usize) -> Option<Ride> {
        self.rides.remove(index)
    }

    /// Empties the pool, returning what was left in deadline order.
    pub fn drain_remaining(&mut self) -> Vec<Ride> {
        self.rides.drain(..).collect()
    }
}
