//! Core data model: rides, vehicles and the problem instance.

use serde::{Deserialize, Serialize};

use crate::grid::{Point, Time};
use crate::scoring::{plan, Pairing};

/// Index of a ride in input order.
pub type RideId = usize;

/// A transport request. Immutable once built; the derived values are computed
/// at construction and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RideRecord")]
pub struct Ride {
    id: RideId,
    origin: Point,
    destination: Point,
    earliest_start: Time,
    latest_finish: Time,
    distance: Time,
    deadline_start: Time,
}

impl Ride {
    pub fn new(
        id: RideId,
        origin: Point,
        destination: Point,
        earliest_start: Time,
        latest_finish: Time,
    ) -> Self {
        let distance = origin.manhattan(destination);
        Self {
            id,
            origin,
            destination,
            earliest_start,
            latest_finish,
            distance,
            deadline_start: latest_finish - distance,
        }
    }

    pub fn id(&self) -> RideId {
        self.id
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn destination(&self) -> Point {
        self.destination
    }

    pub fn earliest_start(&self) -> Time {
        self.earliest_start
    }

    pub fn latest_finish(&self) -> Time {
        self.latest_finish
    }

    /// Trip length from origin to destination.
    pub fn distance(&self) -> Time {
        self.distance
    }

    /// Latest start that could still finish on time, ignoring the approach
    /// leg. Used to order and prune the live pool.
    pub fn deadline_start(&self) -> Time {
        self.deadline_start
    }
}

/// Stored form of a ride. Derived values are rebuilt on load.
#[derive(Deserialize)]
struct RideRecord {
    id: RideId,
    origin: Point,
    destination: Point,
    earliest_start: Time,
    latest_finish: Time,
}

impl From<RideRecord> for Ride {
    fn from(record: RideRecord) -> Self {
        Ride::new(
            record.id,
            record.origin,
            record.destination,
            record.earliest_start,
            record.latest_finish,
        )
    }
}

/// A ride in progress together with its completion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveRide {
    pub ride: Ride,
    pub busy_until: Time,
}

/// One fleet slot. Starts idle at the grid origin.
#[derive(Debug, Clone, Default)]
pub struct Vehicle {
    position: Point,
    active: Option<ActiveRide>,
    history: Vec<Ride>,
}

impl Vehicle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn busy_until(&self) -> Option<Time> {
        self.active.map(|active| active.busy_until)
    }

    pub fn active_ride(&self) -> Option<&Ride> {
        self.active.as_ref().map(|active| &active.ride)
    }

    /// Rides served so far, in the order they were assigned.
    pub fn history(&self) -> &[Ride] {
        &self.history
    }

    pub fn ride_ids(&self) -> Vec<RideId> {
        self.history.iter().map(Ride::id).collect()
    }

    /// Completes the active ride if it is due at `t`, moving the vehicle to
    /// its destination. Returns the completed ride.
    pub fn advance(&mut self, t: Time) -> Option<Ride> {
        match self.active {
            Some(active) if t >= active.busy_until => {
                self.position = active.ride.destination();
                self.active = None;
                Some(active.ride)
            }
            _ => None,
        }
    }

    /// Starts `ride` at step `t` from the current position and records it in
    /// the history. The vehicle must be idle.
    pub fn assign(&mut self, ride: Ride, t: Time) -> Pairing {
        debug_assert!(self.is_idle(), "assigning a ride to a busy vehicle");
        let pairing = plan(self.position, &ride, t);
        debug_assert!(pairing.feasible, "assigning an infeasible ride");
        self.active = Some(ActiveRide {
            ride,
            busy_until: pairing.finish,
        });
        self.history.push(ride);
        pairing
    }
}

/// A validated problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub rows: i64,
    pub columns: i64,
    pub vehicles: usize,
    pub bonus: i64,
    pub horizon: Time,
    pub rides: Vec<Ride>,
}

impl Problem {
    pub fn ride(&self, id: RideId) -> Option<&Ride> {
        self.rides.get(id)
    }
}
