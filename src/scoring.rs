//! Feasibility and scoring of vehicle/ride pairings.

use crate::grid::{Point, Time};
use crate::model::Ride;

/// Score given to a feasible pairing that trips the "too far" guard.
pub const MIN_SCORE: i64 = 1;

/// Timing of a vehicle at `from` serving a ride starting at step `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    /// Steps to reach the ride's origin.
    pub approach: Time,
    /// Idle steps at the origin before the window opens.
    pub wait: Time,
    pub start: Time,
    pub finish: Time,
    /// The ride ends no later than its `latest_finish`.
    pub feasible: bool,
    /// The vehicle reaches the origin no later than `earliest_start`.
    pub bonus_earned: bool,
}

impl Pairing {
    /// Points the judge awards for this pairing, ignoring the selection
    /// guard.
    pub fn points(&self, ride: &Ride, bonus: i64) -> i64 {
        if !self.feasible {
            return 0;
        }
        ride.distance() + if self.bonus_earned { bonus } else { 0 }
    }
}

/// Computes approach, wait, start and finish for `ride` from `from` at `t`.
pub fn plan(from: Point, ride: &Ride, t: Time) -> Pairing {
    let approach = from.manhattan(ride.origin());
    let wait = (ride.earliest_start() - approach - t).max(0);
    let start = t + approach + wait;
    let finish = start + ride.distance();

    Pairing {
        approach,
        wait,
        start,
        finish,
        feasible: finish <= ride.latest_finish(),
        bonus_earned: t + approach <= ride.earliest_start(),
    }
}

/// Per-run scoring parameters derived from the problem and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreParams {
    pub bonus: i64,
    /// `wait + approach` above this many steps trips the guard.
    pub far_threshold: Time,
}

impl ScoreParams {
    pub fn new(bonus: i64, horizon: Time, far_threshold_fraction: f64) -> Self {
        Self {
            bonus,
            far_threshold: (far_threshold_fraction * horizon as f64).floor() as Time,
        }
    }

    /// Selection score of a pairing: 0 when infeasible, [`MIN_SCORE`] when the
    /// vehicle would travel and wait too long, otherwise the ride's points.
    pub fn score(&self, pairing: &Pairing, ride: &Ride) -> i64 {
        if !pairing.feasible {
            return 0;
        }
        if pairing.wait + pairing.approach > self.far_threshold {
            return MIN_SCORE;
        }
        pairing.points(ride, self.bonus)
    }

    /// Plans and scores `ride` from `from` at `t` in one go.
    pub fn score_from(&self, from: Point, ride: &Ride, t: Time) -> (Pairing, i64) {
        let pairing = plan(from, ride, t);
        let score = self.score(&pairing, ride);
        (pairing, score)
    }

    /// Score of serving `first` from `from` at `t` and then `second` straight
    /// after it. The second leg only counts when the first is feasible.
    pub fn couple_score(&self, from: Point, first: &Ride, second: &Ride, t: Time) -> i64 {
        let (lead, lead_score) = self.score_from(from, first, t);
        if !lead.feasible {
            return 0;
        }
        let (_, follow_score) = self.score_from(first.destination(), second, lead.finish);
        lead_score + follow_score
    }
}
