//! Ride selection strategies.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{DispatchConfig, NearSplit, Strategy};
use crate::grid::{Point, Time};
use crate::model::Ride;
use crate::pool::RidePool;
use crate::scoring::{plan, ScoreParams};
use crate::traits::RideSelector;

/// Builds the selector named by `config`.
pub fn selector_for(config: &DispatchConfig, params: ScoreParams) -> Box<dyn RideSelector + Send> {
    match config.strategy {
        Strategy::Couple => Box::new(CoupleSelector::new(params, config.near_split, config.seed)),
        Strategy::Greedy => Box::new(GreedySelector::new(params)),
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    approach: Time,
}

/// Pairwise ride comparison with one ride of lookahead.
///
/// Candidates are ordered by approach distance and cut into a near prefix and
/// a far suffix. A left fold over the feasible near rides keeps a running
/// best, replaced by a challenger `r` only when serving `r` then `best` beats
/// serving `best` then `r`. The far suffix is folded only when nothing near is
/// feasible. The comparison is not transitive, so the result depends on fold
/// order.
#[derive(Debug, Clone)]
pub struct CoupleSelector {
    params: ScoreParams,
    split: NearSplit,
    rng: SmallRng,
    candidates: Vec<Candidate>,
}

impl CoupleSelector {
    pub fn new(params: ScoreParams, split: NearSplit, seed: u64) -> Self {
        Self {
            params,
            split,
            rng: SmallRng::seed_from_u64(seed),
            candidates: Vec::new(),
        }
    }
}

impl RideSelector for CoupleSelector {
    fn select(&mut self, from: Point, pool: &RidePool, t: Time) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }

        self.candidates.clear();
        self.candidates.extend(pool.iter().enumerate().map(|(index, ride)| Candidate {
            index,
            approach: from.manhattan(ride.origin()),
        }));
        // stable: pool order breaks approach ties
        self.candidates.sort_by_key(|candidate| candidate.approach);

        let split = split_point(self.split, &mut self.rng, self.candidates.len());
        let (near, far) = self.candidates.split_at(split);

        fold_best(&self.params, from, pool, near, t)
            .or_else(|| fold_best(&self.params, from, pool, far, t))
    }
}

fn split_point(split: NearSplit, rng: &mut SmallRng, n: usize) -> usize {
    match split {
        NearSplit::Fraction(fraction) => ((n as f64 * fraction).floor() as usize).min(n),
        NearSplit::Random if n == 0 => 0,
        NearSplit::Random => rng.gen_range(1..=n),
    }
}

fn fold_best(
    params: &ScoreParams,
    from: Point,
    pool: &RidePool,
    candidates: &[Candidate],
    t: Time,
) -> Option<usize> {
    let mut best: Option<(usize, &Ride)> = None;

    for candidate in candidates {
        let Some(ride) = pool.get(candidate.index) else {
            continue;
        };
        if !plan(from, ride, t).feasible {
            continue;
        }

        best = match best {
            None => Some((candidate.index, ride)),
            Some((_, current))
                if params.couple_score(from, ride, current, t)
                    > params.couple_score(from, current, ride, t) =>
            {
                Some((candidate.index, ride))
            }
            keep => keep,
        };
    }

    best.map(|(index, _)| index)
}

/// Myopic strategy: the ride with the highest single-pairing score.
#[derive(Debug, Clone)]
pub struct GreedySelector {
    params: ScoreParams,
}

impl GreedySelector {
    pub fn new(params: ScoreParams) -> Self {
        Self { params }
    }
}

impl RideSelector for GreedySelector {
    fn select(&mut self, from: Point, pool: &RidePool, t: Time) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;

        for (index, ride) in pool.iter().enumerate() {
            let (_, score) = self.params.score_from(from, ride, t);
            if score <= 0 {
                continue;
            }
            // first maximum in pool order wins
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        best.map(|(index, _)| index)
    }
}
