//! Tier grouping and top-N selection.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::RankingError;
use crate::models::{display_tier, RankedProfile, TierOrder, UserProfile};
use crate::storage::MatchRepository;

/// All players sharing one raw tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierGroup {
    /// Public-facing tier name
    pub display_tier: String,

    /// Distinct member names in byte order
    pub member_names: Vec<String>,
}

impl TierGroup {
    /// Member names as a single comma-separated string.
    pub fn joined_names(&self) -> String {
        self.member_names.join(",")
    }
}

/// Group profiles by raw tier.
///
/// Groups are keyed on the stored tier, so two stored tiers that render to
/// the same display name still form separate groups.
pub fn aggregate_rankings(profiles: &[UserProfile], order: &TierOrder) -> Vec<TierGroup> {
    let mut by_tier: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for profile in profiles {
        by_tier
            .entry(profile.tier.as_str())
            .or_default()
            .insert(profile.name.as_str());
    }

    let mut tiers: Vec<(&str, BTreeSet<&str>)> = by_tier.into_iter().collect();
    tiers.sort_by(|(a, _), (b, _)| order.compare(a, b));

    tiers
        .into_iter()
        .map(|(tier, names)| TierGroup {
            display_tier: display_tier(tier).to_string(),
            member_names: names.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

/// The first `limit` profiles by tier, then name, as display projections.
pub fn top_ranked(profiles: &[UserProfile], limit: usize, order: &TierOrder) -> Vec<RankedProfile> {
    let mut sorted: Vec<&UserProfile> = profiles.iter().collect();
    sorted.sort_by(|a, b| order.compare(&a.tier, &b.tier).then_with(|| a.name.cmp(&b.name)));

    sorted
        .into_iter()
        .take(limit)
        .map(RankedProfile::from)
        .collect()
}

/// Serves ranking views from the repository.
#[derive(Clone)]
pub struct RankingAggregator {
    repository: Arc<dyn MatchRepository>,
    order: TierOrder,
    top_limit: u32,
}

impl RankingAggregator {
    pub fn new(repository: Arc<dyn MatchRepository>, order: TierOrder, top_limit: u32) -> Self {
        Self {
            repository,
            order,
            top_limit,
        }
    }

    /// Every tier with its members.
    pub async fn rankings(&self) -> Result<Vec<TierGroup>, RankingError> {
        let profiles = self.repository.fetch_all_profiles().await?;
        let groups = aggregate_rankings(&profiles, &self.order);
        debug!("Grouped {} profiles into {} tiers", profiles.len(), groups.len());
        Ok(groups)
    }

    /// The top profiles, `limit` defaulting to the configured size.
    pub async fn top(&self, limit: Option<u32>) -> Result<Vec<RankedProfile>, RankingError> {
        let limit = limit.unwrap_or(self.top_limit);

        // The store already orders by raw tier, so only a ranked order needs
        // the full profile list.
        let profiles = if self.order.is_lexical() {
            self.repository.fetch_top_profiles(limit).await?
        } else {
            self.repository.fetch_all_profiles().await?
        };

        Ok(top_ranked(&profiles, limit as usize, &self.order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;
    use pretty_assertions::assert_eq;

    fn profile(name: &str, tier: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            id: format!("{}-id", name.to_lowercase()),
            tier: tier.to_string(),
            winrate: 50.0,
            champion: "Ahri".to_string(),
            password_hash: "deadbeef".to_string(),
        }
    }

    fn group(tier: &str, names: &[&str]) -> TierGroup {
        TierGroup {
            display_tier: tier.to_string(),
            member_names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn test_aggregate_rankings_example() {
        let profiles = vec![
            profile("A", "Currrent_King"),
            profile("B", "Currrent_King"),
            profile("C", "Gold"),
        ];

        let groups = aggregate_rankings(&profiles, &TierOrder::Lexical);

        assert_eq!(
            groups,
            vec![group("current_king", &["A", "B"]), group("Gold", &["C"])]
        );
    }

    #[test]
    fn test_aggregate_rankings_empty() {
        assert!(aggregate_rankings(&[], &TierOrder::Lexical).is_empty());
    }

    #[test]
    fn test_aggregate_rankings_dedup_and_sort() {
        let profiles = vec![
            profile("zed", "Gold"),
            profile("Bob", "Gold"),
            profile("alice", "Gold"),
            profile("Bob", "Gold"),
        ];

        let groups = aggregate_rankings(&profiles, &TierOrder::Lexical);

        // Byte order: uppercase before lowercase
        assert_eq!(groups, vec![group("Gold", &["Bob", "alice", "zed"])]);
        assert_eq!(groups[0].joined_names(), "Bob,alice,zed");
    }

    #[test]
    fn test_aggregate_rankings_maps_gatekeeper() {
        let profiles = vec![profile("K", "Zate_Keeper"), profile("S", "Silver")];

        let groups = aggregate_rankings(&profiles, &TierOrder::Lexical);

        assert_eq!(groups, vec![group("Silver", &["S"]), group("gatekeeper", &["K"])]);
    }

    #[test]
    fn test_aggregate_rankings_ranked_order() {
        let order = TierOrder::from_list(&[
            "Currrent_King".to_string(),
            "Zate_Keeper".to_string(),
            "Gold".to_string(),
        ]);
        let profiles = vec![
            profile("S", "Silver"),
            profile("G", "Gold"),
            profile("K", "Zate_Keeper"),
            profile("C", "Currrent_King"),
        ];

        let tiers: Vec<String> = aggregate_rankings(&profiles, &order)
            .into_iter()
            .map(|g| g.display_tier)
            .collect();

        assert_eq!(tiers, vec!["current_king", "gatekeeper", "Gold", "Silver"]);
    }

    #[test]
    fn test_top_ranked_limit_and_projection() {
        let profiles = vec![
            profile("E", "Silver"),
            profile("D", "Gold"),
            profile("C", "Currrent_King"),
            profile("B", "Zate_Keeper"),
            profile("A", "Bronze"),
        ];

        let top = top_ranked(&profiles, 2, &TierOrder::Lexical);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "A");
        assert_eq!(top[1].name, "C");
        assert_eq!(top[1].tier, "current_king");

        let json = serde_json::to_value(&top[0]).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 5);
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_top_ranked_limit_larger_than_input() {
        let profiles = vec![profile("A", "Gold")];
        assert_eq!(top_ranked(&profiles, 10, &TierOrder::Lexical).len(), 1);
        assert!(top_ranked(&[], 10, &TierOrder::Lexical).is_empty());
    }

    #[tokio::test]
    async fn test_aggregator_rankings() {
        let repo = Arc::new(InMemoryRepository::new(
            vec![profile("B", "Gold"), profile("A", "Gold")],
            vec![],
        ));
        let aggregator = RankingAggregator::new(repo, TierOrder::Lexical, 10);

        let groups = aggregator.rankings().await.unwrap();

        assert_eq!(groups, vec![group("Gold", &["A", "B"])]);
    }

    #[tokio::test]
    async fn test_aggregator_top_uses_default_limit() {
        let profiles = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|n| profile(n, "Gold"))
            .collect();
        let repo = Arc::new(InMemoryRepository::new(profiles, vec![]));
        let aggregator = RankingAggregator::new(repo, TierOrder::Lexical, 3);

        assert_eq!(aggregator.top(None).await.unwrap().len(), 3);
        assert_eq!(aggregator.top(Some(2)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_aggregator_top_ranked_order() {
        let repo = Arc::new(InMemoryRepository::new(
            vec![profile("G", "Gold"), profile("C", "Currrent_King"), profile("B", "Bronze")],
            vec![],
        ));
        let order = TierOrder::from_list(&["Currrent_King".to_string(), "Gold".to_string()]);
        let aggregator = RankingAggregator::new(repo, order, 10);

        let names: Vec<String> = aggregator
            .top(Some(2))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["C", "G"]);
    }

    #[tokio::test]
    async fn test_aggregator_query_failure() {
        let repo = Arc::new(InMemoryRepository::default());
        repo.set_failing(true);
        let aggregator = RankingAggregator::new(repo, TierOrder::Lexical, 10);

        assert!(matches!(
            aggregator.rankings().await,
            Err(RankingError::Query(_))
        ));
        assert!(matches!(aggregator.top(None).await, Err(RankingError::Query(_))));
    }

    #[tokio::test]
    async fn test_aggregator_empty_store() {
        let aggregator =
            RankingAggregator::new(Arc::new(InMemoryRepository::default()), TierOrder::Lexical, 10);

        assert!(aggregator.rankings().await.unwrap().is_empty());
        assert!(aggregator.top(None).await.unwrap().is_empty());
    }
}
