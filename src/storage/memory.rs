//! In-memory repository used as a test double.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MatchRepository, StorageError};
use crate::models::{Contribution, MatchRecord, MatchRole, ProfileChanges, UserProfile};

/// Holds profiles and matches in vectors behind async locks.
///
/// [`InMemoryRepository::set_failing`] makes every call return an error,
/// standing in for a dropped database connection.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    profiles: RwLock<Vec<UserProfile>>,
    matches: RwLock<Vec<MatchRecord>>,
    failing: AtomicBool,
}

impl InMemoryRepository {
    pub fn new(profiles: Vec<UserProfile>, matches: Vec<MatchRecord>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
            matches: RwLock::new(matches),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the stored profiles.
    pub async fn profiles(&self) -> Vec<UserProfile> {
        self.profiles.read().await.clone()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::InvalidData("connection lost".to_string()))
        } else {
            Ok(())
        }
    }
}

fn sorted_by_tier(mut profiles: Vec<UserProfile>) -> Vec<UserProfile> {
    profiles.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.name.cmp(&b.name)));
    profiles
}

#[async_trait]
impl MatchRepository for InMemoryRepository {
    async fn fetch_contribution(
        &self,
        name: &str,
        role: MatchRole,
    ) -> Result<Contribution, StorageError> {
        self.check()?;
        let matches = self.matches.read().await;

        let contribution = matches
            .iter()
            .filter(|m| m.role_of(name) == Some(role))
            .fold(Contribution::default(), |mut acc, m| {
                let (scored, conceded) = m.points_for(role);
                acc.scored += u64::from(scored);
                acc.conceded += u64::from(conceded);
                acc
            });

        Ok(contribution)
    }

    async fn write_winrate(&self, name: &str, winrate: f64) -> Result<u64, StorageError> {
        self.check()?;
        let mut profiles = self.profiles.write().await;

        let mut rows = 0;
        for profile in profiles.iter_mut().filter(|p| p.name == name) {
            profile.winrate = winrate;
            rows += 1;
        }
        Ok(rows)
    }

    async fn fetch_all_profiles(&self) -> Result<Vec<UserProfile>, StorageError> {
        self.check()?;
        Ok(sorted_by_tier(self.profiles.read().await.clone()))
    }

    async fn fetch_top_profiles(&self, limit: u32) -> Result<Vec<UserProfile>, StorageError> {
        self.check()?;
        let mut profiles = sorted_by_tier(self.profiles.read().await.clone());
        profiles.truncate(limit as usize);
        Ok(profiles)
    }

    async fn fetch_profile_by_id(&self, id: &str) -> Result<Option<UserProfile>, StorageError> {
        self.check()?;
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> Result<u64, StorageError> {
        self.check()?;
        let mut profiles = self.profiles.write().await;

        let Some(profile) = profiles.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        if let Some(hash) = &changes.password_hash {
            profile.password_hash = hash.clone();
        }
        if let Some(champion) = &changes.champion {
            profile.champion = champion.clone();
        }
        Ok(1)
    }

    async fn fetch_match_history(
        &self,
        name: &str,
        limit: u32,
    ) -> Result<Vec<MatchRecord>, StorageError> {
        self.check()?;
        let matches = self.matches.read().await;

        let mut history: Vec<MatchRecord> = matches
            .iter()
            .filter(|m| m.role_of(name).is_some())
            .cloned()
            .collect();
        history.sort_by(|a, b| {
            b.match_date
                .cmp(&a.match_date)
                .then_with(|| b.match_id.cmp(&a.match_id))
        });
        history.truncate(limit as usize);
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn profile(name: &str, tier: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            id: name.to_lowercase(),
            tier: tier.to_string(),
            winrate: 0.0,
            champion: String::new(),
            password_hash: String::new(),
        }
    }

    fn record(winner: &str, loser: &str, win_score: u32, lose_score: u32) -> MatchRecord {
        MatchRecord {
            match_id: 0,
            winner_name: winner.to_string(),
            loser_name: loser.to_string(),
            win_score,
            lose_score,
            match_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_contribution_matches_sqlite_semantics() {
        let repo = InMemoryRepository::new(
            vec![],
            vec![record("A", "B", 10, 3), record("B", "A", 6, 5)],
        );

        let won = repo.fetch_contribution("A", MatchRole::Winner).await.unwrap();
        let lost = repo.fetch_contribution("A", MatchRole::Loser).await.unwrap();

        assert_eq!(won, Contribution { scored: 10, conceded: 3 });
        assert_eq!(lost, Contribution { scored: 5, conceded: 6 });
    }

    #[tokio::test]
    async fn test_top_profiles_sorted_and_limited() {
        let repo = InMemoryRepository::new(
            vec![profile("C", "Gold"), profile("A", "Zate_Keeper"), profile("B", "Currrent_King")],
            vec![],
        );

        let top = repo.fetch_top_profiles(2).await.unwrap();
        let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_failing_repository() {
        let repo = InMemoryRepository::default();
        repo.set_failing(true);

        assert!(repo.fetch_all_profiles().await.is_err());
        assert!(repo.write_winrate("A", 1.0).await.is_err());

        repo.set_failing(false);
        assert!(repo.fetch_all_profiles().await.is_ok());
    }
}
