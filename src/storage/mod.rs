//! Data access for profiles and matches.
//!
//! Everything above this module talks to a [`MatchRepository`]:
//! - [`SqliteRepository`] is the production store (sqlx over SQLite)
//! - `InMemoryRepository` (tests only) is a double with failure injection

#[cfg(test)]
mod memory;
mod sqlite;

#[cfg(test)]
pub(crate) use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::models::{
    Contribution, MatchRecord, MatchRole, NewProfile, ProfileChanges, UserProfile, UserStats,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Data-access seam for the ranking components.
///
/// Implementations are shared across requests, so every method takes `&self`.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Sum the points scored and conceded by `name` over every match where
    /// they played `role`. A user with no such matches gets zeros.
    async fn fetch_contribution(
        &self,
        name: &str,
        role: MatchRole,
    ) -> Result<Contribution, StorageError>;

    /// Totals for both roles, merged.
    async fn fetch_user_stats(&self, name: &str) -> Result<UserStats, StorageError> {
        let won = self.fetch_contribution(name, MatchRole::Winner).await?;
        let lost = self.fetch_contribution(name, MatchRole::Loser).await?;
        Ok(UserStats::merge(won, lost))
    }

    /// Store a winrate for the profile whose name equals `name` exactly.
    /// Returns the number of rows updated.
    async fn write_winrate(&self, name: &str, winrate: f64) -> Result<u64, StorageError>;

    async fn fetch_all_profiles(&self) -> Result<Vec<UserProfile>, StorageError>;

    /// First `limit` profiles ordered by raw tier string, then name.
    async fn fetch_top_profiles(&self, limit: u32) -> Result<Vec<UserProfile>, StorageError>;

    async fn fetch_profile_by_id(&self, id: &str) -> Result<Option<UserProfile>, StorageError>;

    /// Apply `changes` to the profile with `id`. Returns rows updated.
    async fn update_profile(&self, id: &str, changes: &ProfileChanges)
        -> Result<u64, StorageError>;

    /// Matches where `name` was winner or loser, newest first.
    async fn fetch_match_history(
        &self,
        name: &str,
        limit: u32,
    ) -> Result<Vec<MatchRecord>, StorageError>;
}

/// Contents of an import file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportData {
    #[serde(default)]
    pub profiles: Vec<NewProfile>,

    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

impl ImportData {
    /// Read an import file (JSON).
    pub fn from_file(path: &Path) -> Result<Self, StorageError> {
        let contents = std::fs::read_to_string(path)?;
        let data: ImportData = serde_json::from_str(&contents)?;
        Ok(data)
    }
}
