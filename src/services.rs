//! Front-end helpers that turn user input (names, list positions, dates)
//! into store calls, reporting lookups that fail as typed errors.

use jiff::{Timestamp, ToSpan, Zoned, civil::Date};
use thiserror::Error;

pub mod projects;
pub mod sections;
pub mod tasks;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("{kind} '{query}' not found")]
    NotFound { kind: &'static str, query: String },

    #[error("{kind} name is ambiguous. Multiple matches found: {}", .matches.join(", "))]
    Ambiguous {
        kind: &'static str,
        matches: Vec<String>,
    },
}

/// Picks the single candidate whose name matches `query`.
///
/// A case-insensitive exact match wins; otherwise the query must be
/// contained in exactly one name.
pub(crate) fn resolve_one<'a, T>(
    kind: &'static str,
    query: &str,
    candidates: impl Iterator<Item = &'a T> + Clone,
    name: impl Fn(&T) -> &str,
) -> Result<&'a T, LookupError> {
    let needle = query.to_lowercase();

    let exact: Vec<&T> = candidates
        .clone()
        .filter(|c| name(*c).to_lowercase() == needle)
        .collect();
    if exact.len() == 1 {
        return Ok(exact[0]);
    }

    let matching: Vec<&T> = candidates
        .filter(|c| name(*c).to_lowercase().contains(&needle))
        .collect();

    match matching.len() {
        0 => Err(LookupError::NotFound {
            kind,
            query: query.to_string(),
        }),
        1 => Ok(matching[0]),
        _ => Err(LookupError::Ambiguous {
            kind,
            matches: matching.iter().map(|c| name(*c).to_string()).collect(),
        }),
    }
}

/// Parses a due date given as `YYYY-MM-DD`, `today` or `tomorrow`.
///
/// The task falls due at the start of that day in `now`'s time zone.
pub fn parse_due_date(input: &str, now: &Zoned) -> Result<Timestamp, String> {
    let day = match input.trim().to_lowercase().as_str() {
        "today" => now.date(),
        "tomorrow" => now.date().saturating_add(1.day()),
        other => other.parse::<Date>().map_err(|e| e.to_string())?,
    };

    day.to_zoned(now.time_zone().clone())
        .map(|zoned| zoned.timestamp())
        .map_err(|e| e.to_string())
}
