//! Ranking and winrate computation.
//!
//! Pure functions over already-fetched rows, plus thin services that pull
//! rows from an injected [`MatchRepository`](crate::storage::MatchRepository):
//! - Winrate from aggregated match points
//! - Tier grouping for the ranking board
//! - Top-N profile selection

mod ranking;
mod winrate;

pub use ranking::*;
pub use winrate::*;

use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by the ranking components.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Query error: {0}")]
    Query(#[from] StorageError),
}

/// Reject empty or whitespace-only identifiers.
pub(crate) fn require_identifier<'a>(value: &'a str, what: &str) -> Result<&'a str, RankingError> {
    if value.trim().is_empty() {
        return Err(RankingError::Validation(format!(
            "{} parameter is required.",
            what
        )));
    }
    Ok(value)
}
