//! Winrate computation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::{require_identifier, RankingError};
use crate::models::UserStats;
use crate::storage::MatchRepository;

/// Calculate a winrate percentage (0.0 to 100.0) from aggregated points.
///
/// A user with no recorded points has a winrate of 0.
pub fn compute_winrate(stats: &UserStats) -> f64 {
    let total = stats.total();
    if total == 0 {
        0.0
    } else {
        stats.credited() as f64 / total as f64 * 100.0
    }
}

/// Outcome of recomputing one user's winrate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinrateUpdate {
    pub name: String,
    pub winrate: f64,
    /// Profiles whose stored winrate changed. Zero when no profile has this
    /// exact name.
    pub rows_affected: u64,
}

/// Recomputes and stores winrates.
///
/// The read of match totals and the write of the winrate are separate
/// statements. Two concurrent updates for the same user are last-write-wins.
#[derive(Clone)]
pub struct WinrateCalculator {
    repository: Arc<dyn MatchRepository>,
}

impl WinrateCalculator {
    pub fn new(repository: Arc<dyn MatchRepository>) -> Self {
        Self { repository }
    }

    /// Recompute the winrate for `name` and write it to their profile.
    pub async fn update_winrate(&self, name: &str) -> Result<WinrateUpdate, RankingError> {
        let name = require_identifier(name, "Name")?;

        let stats = self.repository.fetch_user_stats(name).await?;
        let winrate = compute_winrate(&stats);
        let rows_affected = self.repository.write_winrate(name, winrate).await?;

        if rows_affected == 0 {
            warn!("No profile named {:?}; winrate {:.2} not stored", name, winrate);
        } else {
            info!("Winrate of {} updated to {:.2}", name, winrate);
        }

        Ok(WinrateUpdate {
            name: name.to_string(),
            winrate,
            rows_affected,
        })
    }

    /// Recompute the winrate of every stored profile.
    ///
    /// Stops at the first failure.
    pub async fn update_all_winrates(&self) -> Result<Vec<WinrateUpdate>, RankingError> {
        let profiles = self.repository.fetch_all_profiles().await?;
        let mut updates = Vec::with_capacity(profiles.len());

        for profile in &profiles {
            updates.push(self.update_winrate(&profile.name).await?);
        }

        info!("Recomputed {} winrates", updates.len());
        Ok(updates)
    }
}
