use std::sync::Arc;

use crate::calculate::{RankingAggregator, WinrateCalculator};
use crate::config::AppConfig;
use crate::storage::MatchRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn MatchRepository>,
    pub winrate: WinrateCalculator,
    pub rankings: RankingAggregator,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repository: Arc<dyn MatchRepository>, config: AppConfig) -> Self {
        let rankings = RankingAggregator::new(
            repository.clone(),
            config.ranking.tier_order(),
            config.ranking.top_limit,
        );

        Self {
            winrate: WinrateCalculator::new(repository.clone()),
            rankings,
            repository,
            config: Arc::new(config),
        }
    }
}
