//! Test fixtures for ride-dispatch.
//!
//! Provides:
//! - Builders for rides and problems with sensible defaults
//! - The small reference dataset used by the smoke tests
//! - A seeded random problem generator

#![allow(dead_code)]

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use ride_dispatch::config::{DispatchConfig, NearSplit, Strategy};
use ride_dispatch::grid::{Point, Time};
use ride_dispatch::model::{Problem, Ride};

/// Three rides, two vehicles, bonus 2, ten steps.
pub const A_EXAMPLE: &str = "\
3 4 2 3 2 10
0 0 1 3 2 9
1 2 1 0 0 9
2 0 2 2 2 9
";

/// Builder for test rides. Ids are assigned by [`ProblemBuilder`].
#[derive(Clone, Debug)]
pub struct TestRide {
    origin: Point,
    destination: Point,
    earliest_start: Time,
    latest_finish: Time,
}

impl TestRide {
    pub fn new(from: (i64, i64), to: (i64, i64)) -> Self {
        Self {
            origin: Point::new(from.0, from.1),
            destination: Point::new(to.0, to.1),
            earliest_start: 0,
            latest_finish: 1_000,
        }
    }

    pub fn window(mut self, earliest_start: Time, latest_finish: Time) -> Self {
        self.earliest_start = earliest_start;
        self.latest_finish = latest_finish;
        self
    }
}

/// Builder for problems with sensible defaults.
#[derive(Clone, Debug)]
pub struct ProblemBuilder {
    vehicles: usize,
    bonus: i64,
    horizon: Time,
    rides: Vec<TestRide>,
}

impl ProblemBuilder {
    pub fn new() -> Self {
        Self {
            vehicles: 1,
            bonus: 0,
            horizon: 100,
            rides: Vec::new(),
        }
    }

    pub fn vehicles(mut self, vehicles: usize) -> Self {
        self.vehicles = vehicles;
        self
    }

    pub fn bonus(mut self, bonus: i64) -> Self {
        self.bonus = bonus;
        self
    }

    pub fn horizon(mut self, horizon: Time) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn ride(mut self, ride: TestRide) -> Self {
        self.rides.push(ride);
        self
    }

    pub fn build(self) -> Problem {
        let rides = self
            .rides
            .into_iter()
            .enumerate()
            .map(|(id, r)| Ride::new(id, r.origin, r.destination, r.earliest_start, r.latest_finish))
            .collect();
        Problem {
            rows: 100,
            columns: 100,
            vehicles: self.vehicles,
            bonus: self.bonus,
            horizon: self.horizon,
            rides,
        }
    }
}

/// Config with the far guard out of the way and every candidate near.
pub fn plain_config(strategy: Strategy) -> DispatchConfig {
    DispatchConfig {
        strategy,
        near_split: NearSplit::Fraction(1.0),
        far_threshold_fraction: 1.0,
        progress_interval: 0,
        ..Default::default()
    }
}

/// Random problem on a `size` x `size` grid with loose but finite windows.
pub fn random_problem(seed: u64, vehicles: usize, rides: usize, size: i64, horizon: Time) -> Problem {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut builder = ProblemBuilder::new()
        .vehicles(vehicles)
        .bonus(rng.gen_range(0..20))
        .horizon(horizon);

    for _ in 0..rides {
        let from = (rng.gen_range(0..size), rng.gen_range(0..size));
        let to = (rng.gen_range(0..size), rng.gen_range(0..size));
        let distance = (from.0 - to.0).abs() + (from.1 - to.1).abs();
        let earliest = rng.gen_range(0..horizon);
        let slack = rng.gen_range(0..horizon / 2);
        builder = builder.ride(TestRide::new(from, to).window(earliest, earliest + distance + slack));
    }

    builder.build()
}
