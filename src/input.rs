//! Reader for the textual problem format.
//!
//! ```text
//! rows columns vehicles rides bonus horizon
//! origin_x origin_y destination_x destination_y earliest_start latest_finish
//! ...
//! ```
//!
//! Rides are numbered by their position among the ride lines. Blank lines are
//! skipped.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::grid::Point;
use crate::model::{Problem, Ride};

const FIELDS_PER_LINE: usize = 6;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input is empty, expected a header line")]
    MissingHeader,

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: `{token}` is not an integer")]
    InvalidInteger { line: usize, token: String },

    #[error("line {line}: {field} must not be negative, got {value}")]
    NegativeCount {
        line: usize,
        field: &'static str,
        value: i64,
    },

    #[error("header declares {declared} rides but {found} ride lines follow")]
    RideCount { declared: usize, found: usize },

    #[error("line {line}: earliest start {earliest_start} is after latest finish {latest_finish}")]
    InvalidWindow {
        line: usize,
        earliest_start: i64,
        latest_finish: i64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ParseResult<T> = Result<T, ParseError>;

pub fn read_problem(path: &Path) -> ParseResult<Problem> {
    let text = fs::read_to_string(path)?;
    parse_problem(&text)
}

pub fn parse_problem(text: &str) -> ParseResult<Problem> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines.next().ok_or(ParseError::MissingHeader)?;
    let [rows, columns, vehicles, ride_count, bonus, horizon] = parse_fields(header_line, header)?;
    let vehicles = non_negative(header_line, "vehicle count", vehicles)?;
    let ride_count = non_negative(header_line, "ride count", ride_count)?;
    non_negative(header_line, "horizon", horizon)?;

    let mut rides = Vec::with_capacity(ride_count.min(1_000_000));
    for (line, text) in lines {
        let [ox, oy, dx, dy, earliest_start, latest_finish] = parse_fields(line, text)?;
        if earliest_start > latest_finish {
            return Err(ParseError::InvalidWindow {
                line,
                earliest_start,
                latest_finish,
            });
        }
        rides.push(Ride::new(
            rides.len(),
            Point::new(ox, oy),
            Point::new(dx, dy),
            earliest_start,
            latest_finish,
        ));
    }

    if rides.len() != ride_count {
        return Err(ParseError::RideCount {
            declared: ride_count,
            found: rides.len(),
        });
    }

    Ok(Problem {
        rows,
        columns,
        vehicles,
        bonus,
        horizon,
        rides,
    })
}

fn parse_fields(line: usize, text: &str) -> ParseResult<[i64; FIELDS_PER_LINE]> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != FIELDS_PER_LINE {
        return Err(ParseError::FieldCount {
            line,
            expected: FIELDS_PER_LINE,
            found: tokens.len(),
        });
    }

    let mut fields = [0; FIELDS_PER_LINE];
    for (field, token) in fields.iter_mut().zip(tokens) {
        *field = token.parse().map_err(|_| ParseError::InvalidInteger {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(fields)
}

fn non_negative(line: usize, field: &'static str, value: i64) -> ParseResult<usize> {
    usize::try_from(value).map_err(|_| ParseError::NegativeCount { line, field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "3 4 2 3 2 10\n0 0 1 3 2 9\n1 2 1 0 0 9\n2 0 2 2 2 9\n";

    #[test]
    fn test_parses_header_and_rides() {
        let problem = parse_problem(EXAMPLE).expect("valid input");
        assert_eq!(problem.rows, 3);
        assert_eq!(problem.columns, 4);
        assert_eq!(problem.vehicles, 2);
        assert_eq!(problem.bonus, 2);
        assert_eq!(problem.horizon, 10);
        assert_eq!(problem.rides.len(), 3);

        let ride = &problem.rides[1];
        assert_eq!(ride.id(), 1);
        assert_eq!(ride.origin(), Point::new(1, 2));
        assert_eq!(ride.destination(), Point::new(1, 0));
        assert_eq!(ride.earliest_start(), 0);
        assert_eq!(ride.latest_finish(), 9);
        assert_eq!(ride.distance(), 2);
    }

    #[test]
    fn test_skips_blank_lines_and_extra_spaces() {
        let text = "\n3 4 1 1 2 10\n\n  0  0 1 3   2 9 \n\n";
        let problem = parse_problem(text).expect("valid input");
        assert_eq!(problem.rides.len(), 1);
        assert_eq!(problem.rides[0].distance(), 4);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_problem("  \n"), Err(ParseError::MissingHeader)));
    }

    #[test]
    fn test_wrong_field_count_reports_line() {
        let err = parse_problem("3 4 2 1 2 10\n0 0 1 3 2\n").unwrap_err();
        assert!(matches!(err, ParseError::FieldCount { line: 2, expected: 6, found: 5 }));
    }

    #[test]
    fn test_non_integer_field() {
        let err = parse_problem("3 4 2 1 2 ten\n").unwrap_err();
        match err {
            ParseError::InvalidInteger { line, token } => {
                assert_eq!(line, 1);
                assert_eq!(token, "ten");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_vehicle_count() {
        let err = parse_problem("3 4 -1 0 2 10\n").unwrap_err();
        assert!(matches!(err, ParseError::NegativeCount { field: "vehicle count", .. }));
    }

    #[test]
    fn test_ride_count_mismatch() {
        let err = parse_problem("3 4 2 2 2 10\n0 0 1 3 2 9\n").unwrap_err();
        assert!(matches!(err, ParseError::RideCount { declared: 2, found: 1 }));
    }

    #[test]
    fn test_inverted_window() {
        let err = parse_problem("3 4 2 1 2 10\n0 0 1 3 9 2\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidWindow { line: 2, earliest_start: 9, latest_finish: 2 }
        ));
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = parse_problem("3 4 2 2 2 10\n0 0 1 3 2 9\n").unwrap_err();
        assert_eq!(err.to_string(), "header declares 2 rides but 1 ride lines follow");
    }
}
