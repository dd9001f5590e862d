//! Property tests for the ride model, scoring and pool pruning.

use proptest::prelude::*;

use ride_dispatch::grid::Point;
use ride_dispatch::model::Ride;
use ride_dispatch::pool::RidePool;
use ride_dispatch::scoring::{plan, ScoreParams, MIN_SCORE};

fn point() -> impl Strategy<Value = Point> {
    (0i64..200, 0i64..200).prop_map(|(x, y)| Point::new(x, y))
}

fn ride(id: usize) -> impl Strategy<Value = Ride> {
    (point(), point(), 0i64..500, 0i64..500).prop_map(move |(origin, destination, earliest, slack)| {
        let distance = (origin.x - destination.x).abs() + (origin.y - destination.y).abs();
        Ride::new(id, origin, destination, earliest, earliest + distance + slack)
    })
}

fn rides() -> impl Strategy<Value = Vec<Ride>> {
    prop::collection::vec(ride(0), 0..40).prop_map(|rides| {
        rides
            .into_iter()
            .enumerate()
            .map(|(id, r)| {
                Ride::new(id, r.origin(), r.destination(), r.earliest_start(), r.latest_finish())
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn ride_derived_values(r in ride(0)) {
        let dx = (r.origin().x - r.destination().x).abs();
        let dy = (r.origin().y - r.destination().y).abs();
        prop_assert_eq!(r.distance(), dx + dy);
        prop_assert_eq!(r.deadline_start(), r.latest_finish() - dx - dy);
    }

    #[test]
    fn pruned_pool_is_viable_and_sorted(rides in rides(), t in 0i64..1200) {
        let total = rides.len();
        let mut pool = RidePool::new(rides);
        let expired = pool.prune_expired(t);

        prop_assert_eq!(expired.len() + pool.len(), total);
        prop_assert!(expired.iter().all(|r| r.deadline_start() < t));
        prop_assert!(pool.iter().all(|r| r.deadline_start() >= t));

        let deadlines: Vec<i64> = pool.iter().map(Ride::deadline_start).collect();
        prop_assert!(deadlines.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn bonus_iff_on_time_arrival(from in point(), r in ride(0), t in 0i64..600, bonus in 1i64..50) {
        let pairing = plan(from, &r, t);
        let arrival = t + from.manhattan(r.origin());

        prop_assert_eq!(pairing.start, arrival.max(r.earliest_start()));
        prop_assert_eq!(pairing.finish, pairing.start + r.distance());
        prop_assert_eq!(pairing.feasible, pairing.finish <= r.latest_finish());
        prop_assert_eq!(pairing.bonus_earned, arrival <= r.earliest_start());

        let params = ScoreParams::new(bonus, 10_000, 1.0);
        let (_, score) = params.score_from(from, &r, t);
        if !pairing.feasible {
            prop_assert_eq!(score, 0);
        } else if pairing.bonus_earned {
            prop_assert_eq!(score, r.distance() + bonus);
        } else {
            prop_assert_eq!(score, r.distance());
        }
    }

    #[test]
    fn far_guard_deprioritizes_but_never_excludes(from in point(), r in ride(0), t in 0i64..600) {
        let params = ScoreParams::new(0, 100, 0.0);
        let (pairing, score) = params.score_from(from, &r, t);
        if !pairing.feasible {
            prop_assert_eq!(score, 0);
        } else if pairing.wait + pairing.approach > 0 {
            prop_assert_eq!(score, MIN_SCORE);
        } else {
            prop_assert_eq!(score, r.distance());
        }
    }
}
