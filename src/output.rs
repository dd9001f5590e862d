//! Solution records: encoding, decoding and scoring.
//!
//! A solution has one line per vehicle in fleet order, `<count> <id>...`, with
//! ride ids in the order the vehicle served them.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::grid::{Point, Time};
use crate::model::{Problem, RideId, Vehicle};
use crate::scoring::plan;
use crate::solver::DispatchResult;

/// Ride ids per vehicle, in fleet order.
pub type Solution = Vec<Vec<RideId>>;

#[derive(Debug, Error)]
pub enum SolutionError {
    #[error("line {line}: `{token}` is not a ride count or id")]
    InvalidToken { line: usize, token: String },

    #[error("line {line}: declares {declared} rides but lists {found}")]
    CountMismatch {
        line: usize,
        declared: usize,
        found: usize,
    },

    #[error("solution has {routes} routes but the fleet has {vehicles} vehicles")]
    TooManyRoutes { routes: usize, vehicles: usize },

    #[error("vehicle {vehicle}: ride {ride_id} does not exist")]
    UnknownRide { vehicle: usize, ride_id: RideId },

    #[error("vehicle {vehicle}: ride {ride_id} is already served by another vehicle")]
    DuplicateRide { vehicle: usize, ride_id: RideId },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub fn encode_solution(result: &DispatchResult) -> String {
    encode_routes(result.routes.iter().map(|route| route.ride_ids.as_slice()))
}

/// Encodes the fleet's histories directly.
pub fn encode_fleet(fleet: &[Vehicle]) -> String {
    let ids: Vec<Vec<RideId>> = fleet.iter().map(Vehicle::ride_ids).collect();
    encode_routes(ids.iter().map(Vec::as_slice))
}

fn encode_routes<'a>(routes: impl Iterator<Item = &'a [RideId]>) -> String {
    routes
        .map(|ids| {
            let mut line = ids.len().to_string();
            for id in ids {
                line.push(' ');
                line.push_str(&id.to_string());
            }
            line.push('\n');
            line
        })
        .collect()
}

pub fn write_solution(path: &Path, result: &DispatchResult) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(encode_solution(result).as_bytes())?;
    writer.flush()
}

pub fn read_solution(path: &Path) -> Result<Solution, SolutionError> {
    let text = std::fs::read_to_string(path)?;
    parse_solution(&text)
}

pub fn parse_solution(text: &str) -> Result<Solution, SolutionError> {
    let mut solution = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let mut tokens = line.split_whitespace();
        let Some(count) = tokens.next() else {
            continue;
        };
        let declared = parse_id(line_no, count)?;
        let ids = tokens
            .map(|token| parse_id(line_no, token))
            .collect::<Result<Vec<_>, _>>()?;
        if ids.len() != declared {
            return Err(SolutionError::CountMismatch {
                line: line_no,
                declared,
                found: ids.len(),
            });
        }
        solution.push(ids);
    }

    Ok(solution)
}

fn parse_id(line: usize, token: &str) -> Result<usize, SolutionError> {
    token.parse().map_err(|_| SolutionError::InvalidToken {
        line,
        token: token.to_string(),
    })
}

/// Judge's view of a solution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub total_score: i64,
    pub distance_points: i64,
    pub bonus_points: i64,
    /// Rides finished by their latest finish.
    pub on_time: usize,
    pub bonuses: usize,
    /// Rides that finished too late and earned nothing.
    pub late: usize,
}

/// Replays every vehicle from the origin at step 0 and scores the rides it
/// completes on time.
pub fn evaluate(problem: &Problem, solution: &Solution) -> Result<ScoreReport, SolutionError> {
    if solution.len() > problem.vehicles {
        return Err(SolutionError::TooManyRoutes {
            routes: solution.len(),
            vehicles: problem.vehicles,
        });
    }

    let mut served = vec![false; problem.rides.len()];
    let mut report = ScoreReport::default();

    for (vehicle, ids) in solution.iter().enumerate() {
        let mut position = Point::ORIGIN;
        let mut t: Time = 0;

        for &ride_id in ids {
            let ride = problem
                .ride(ride_id)
                .ok_or(SolutionError::UnknownRide { vehicle, ride_id })?;
            if std::mem::replace(&mut served[ride_id], true) {
                return Err(SolutionError::DuplicateRide { vehicle, ride_id });
            }

            let pairing = plan(position, ride, t);
            if pairing.feasible {
                report.on_time += 1;
                report.distance_points += ride.distance();
                if pairing.bonus_earned {
                    report.bonuses += 1;
                    report.bonus_points += problem.bonus;
                }
            } else {
                report.late += 1;
            }

            position = ride.destination();
            t = pairing.finish;
        }
    }

    report.total_score = report.distance_points + report.bonus_points;
    Ok(report)
}
