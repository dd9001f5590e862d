//! Time-stepped dispatch simulation.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::config::DispatchConfig;
use crate::grid::Time;
use crate::matcher::selector_for;
use crate::model::{Problem, Ride, RideId, Vehicle};
use crate::pool::RidePool;
use crate::scoring::ScoreParams;
use crate::traits::RideSelector;

/// Why a ride ended the run without a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnassignedReason {
    /// Pruned once its start deadline had passed.
    Expired,
    /// Still in the pool when the horizon was reached.
    Unserved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignedRide {
    pub ride_id: RideId,
    pub reason: UnassignedReason,
}

/// A committed vehicle/ride pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub vehicle: usize,
    pub ride_id: RideId,
    pub assigned_at: Time,
    pub start: Time,
    pub finish: Time,
    pub bonus_earned: bool,
    /// Distance plus bonus, as the judge would award them.
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteResult {
    pub vehicle: usize,
    pub ride_ids: Vec<RideId>,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    /// One route per vehicle, in fleet order.
    pub routes: Vec<RouteResult>,
    pub unassigned: Vec<UnassignedRide>,
    pub assignments: Vec<Assignment>,
    pub total_score: i64,
}

impl DispatchResult {
    pub fn rides_served(&self) -> usize {
        self.assignments.len()
    }
}

/// Runs `problem` to the horizon with the strategy named in `config`.
pub fn solve(problem: &Problem, config: &DispatchConfig) -> DispatchResult {
    let params = ScoreParams::new(problem.bonus, problem.horizon, config.far_threshold_fraction);
    let selector = selector_for(config, params);
    Simulation::new(problem, selector)
        .with_progress_interval(config.progress_interval)
        .run()
}

/// One run's fleet and live pool, advanced one step at a time.
///
/// Each step prunes expired rides, completes due rides, then offers the pool
/// to every idle vehicle in fleet order. An assigned ride leaves the pool at
/// once, so a lower-indexed vehicle wins any contested ride.
#[derive(Debug)]
pub struct Simulation<S> {
    bonus: i64,
    horizon: Time,
    progress_interval: Time,
    time: Time,
    fleet: Vec<Vehicle>,
    pool: RidePool,
    selector: S,
    assignments: Vec<Assignment>,
    expired: Vec<RideId>,
    idle: Vec<usize>,
}

impl<S: RideSelector> Simulation<S> {
    pub fn new(problem: &Problem, selector: S) -> Self {
        Self {
            bonus: problem.bonus,
            horizon: problem.horizon,
            progress_interval: 0,
            time: 0,
            fleet: vec![Vehicle::new(); problem.vehicles],
            pool: RidePool::new(problem.rides.clone()),
            selector,
            assignments: Vec::new(),
            expired: Vec::new(),
            idle: Vec::with_capacity(problem.vehicles),
        }
    }

    pub fn with_progress_interval(mut self, steps: Time) -> Self {
        self.progress_interval = steps;
        self
    }

    /// The step the next call to [`step`](Self::step) will simulate.
    pub fn time(&self) -> Time {
        self.time
    }

    pub fn is_finished(&self) -> bool {
        self.time >= self.horizon
    }

    pub fn fleet(&self) -> &[Vehicle] {
        &self.fleet
    }

    pub fn pool(&self) -> &RidePool {
        &self.pool
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Simulates the current step. Returns `false` once the horizon is
    /// reached and nothing was done.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let t = self.time;

        let expired = self.pool.prune_expired(t);
        if !expired.is_empty() {
            trace!(t, count = expired.len(), "rides expired");
            self.expired.extend(expired.iter().map(Ride::id));
        }

        for vehicle in &mut self.fleet {
            vehicle.advance(t);
        }

        self.idle.clear();
        self.idle.extend(
            self.fleet
                .iter()
                .enumerate()
                .filter(|(_, vehicle)| vehicle.is_idle())
                .map(|(index, _)| index),
        );

        for &vehicle_index in &self.idle {
            if self.pool.is_empty() {
                break;
            }
            let vehicle = &mut self.fleet[vehicle_index];
            let Some(pool_index) = self.selector.select(vehicle.position(), &self.pool, t) else {
                continue;
            };
            let Some(ride) = self.pool.take(pool_index) else {
                continue;
            };

            let pairing = vehicle.assign(ride, t);
            let points = pairing.points(&ride, self.bonus);
            trace!(
                t,
                vehicle = vehicle_index,
                ride = ride.id(),
                start = pairing.start,
                finish = pairing.finish,
                points,
                "ride assigned"
            );
            self.assignments.push(Assignment {
                vehicle: vehicle_index,
                ride_id: ride.id(),
                assigned_at: t,
                start: pairing.start,
                finish: pairing.finish,
                bonus_earned: pairing.bonus_earned,
                points,
            });
        }

        if self.progress_interval > 0 && t % self.progress_interval == 0 {
            debug!(t, horizon = self.horizon, rides_left = self.pool.len(), "progress");
        }

        self.time += 1;
        true
    }

    /// Steps to the horizon and collects the result.
    pub fn run(mut self) -> DispatchResult {
        info!(
            vehicles = self.fleet.len(),
            rides = self.pool.len(),
            horizon = self.horizon,
            "simulation started"
        );
        while self.step() {}
        let result = self.into_result();
        info!(
            score = result.total_score,
            served = result.rides_served(),
            unassigned = result.unassigned.len(),
            "simulation finished"
        );
        result
    }

    /// Collects the result as of the current step. In-progress rides count
    /// as served.
    pub fn into_result(mut self) -> DispatchResult {
        let mut points = vec![0; self.fleet.len()];
        for assignment in &self.assignments {
            points[assignment.vehicle] += assignment.points;
        }

        let routes = self
            .fleet
            .iter()
            .zip(points)
            .enumerate()
            .map(|(vehicle, (state, points))| RouteResult {
                vehicle,
                ride_ids: state.ride_ids(),
                points,
            })
            .collect();

        let mut unassigned: Vec<UnassignedRide> = self
            .expired
            .iter()
            .map(|&ride_id| UnassignedRide {
                ride_id,
                reason: UnassignedReason::Expired,
            })
            .chain(self.pool.drain_remaining().into_iter().map(|ride| UnassignedRide {
                ride_id: ride.id(),
                reason: UnassignedReason::Unserved,
            }))
            .collect();
        unassigned.sort_by_key(|u| u.ride_id);

        let total_score = self.assignments.iter().map(|a| a.points).sum();

        DispatchResult {
            routes,
            unassigned,
            assignments: self.assignments,
            total_score,
        }
    }
}
