use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::extract::ApiQuery;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{RankingError, TierGroup};
use crate::models::RankedProfile;

/// One row of the ranking board.
#[derive(Debug, Serialize)]
pub struct RankingEntry {
    /// Member names, comma-joined
    pub name: String,
    pub tier: String,
}

impl From<TierGroup> for RankingEntry {
    fn from(group: TierGroup) -> Self {
        Self {
            name: group.joined_names(),
            tier: group.display_tier,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TopRankParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct WinrateResponse {
    pub status: &'static str,
    pub message: String,
    pub winrate: f64,
}

pub async fn list_rankings(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankingEntry>>, ApiError> {
    let groups = state.rankings.rankings().await?;
    Ok(Json(groups.into_iter().map(RankingEntry::from).collect()))
}

pub async fn top_rankings(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TopRankParams>,
) -> Result<Json<Vec<RankedProfile>>, ApiError> {
    let limit = params.limit.map(|l| l.clamp(1, 100));
    let top = state.rankings.top(limit).await?;
    Ok(Json(top))
}

pub async fn update_winrate(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<WinrateResponse>, ApiError> {
    // A failed read or write leaves the stored winrate stale; report it as a
    // server fault rather than a bad query.
    let update = state.winrate.update_winrate(&name).await.map_err(|e| match e {
        RankingError::Query(err) => ApiError::Internal(err.to_string()),
        other => ApiError::from(other),
    })?;

    Ok(Json(WinrateResponse {
        status: "ok",
        message: format!("Winrate of {} updated successfully.", update.name),
        winrate: update.winrate,
    }))
}
