use ccextract_providers::session_date;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::debug;

use crate::{Error, Result};

/// Parse a `YYYY-MM-DD` command-line date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

/// Keep sessions whose first timestamp falls within `from..=to`, by day.
///
/// Sessions without a readable timestamp are kept.
pub fn filter_sessions_by_date(
    sessions: Vec<PathBuf>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<PathBuf> {
    if from.is_none() && to.is_none() {
        return sessions;
    }

    sessions
        .into_iter()
        .filter(|path| match session_date(path) {
            Some(date) => {
                from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
            }
            None => {
                debug!(session = %path.display(), "no session date, keeping");
                true
            }
        })
        .collect()
}

/// Parse a 1-based selection list such as `1,3,5` into 0-based indices.
///
/// Entries that are not numbers, zero, or beyond `available` are returned
/// separately so the caller can report them.
pub fn parse_indices(spec: &str, available: usize) -> (Vec<usize>, Vec<String>) {
    let mut indices = Vec::new();
    let mut invalid = Vec::new();
    for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match item.parse::<usize>() {
            Ok(n) if n >= 1 && n <= available => indices.push(n - 1),
            _ => invalid.push(item.to_string()),
        }
    }
    (indices, invalid)
}
