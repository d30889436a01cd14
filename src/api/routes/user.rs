use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::StatusResponse;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::require_identifier;
use crate::models::{
    display_tier, hash_password, verify_password, MatchRecord, ProfileChanges, UserProfile,
};
use crate::storage::StorageError;

#[derive(Debug, Serialize)]
pub struct RouterProbeResponse {
    pub router: &'static str,
}

/// Profile details returned on a successful lookup or login.
#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub status: &'static str,
    pub message: String,
    pub name: String,
    pub id: String,
    pub champion: String,
    pub tier: String,
}

impl UserInfoResponse {
    fn from_profile(profile: UserProfile) -> Self {
        Self {
            status: "ok",
            message: "User logged in success.".to_string(),
            tier: display_tier(&profile.tier).to_string(),
            name: profile.name,
            id: profile.id,
            champion: profile.champion,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub password: Option<String>,
    pub champion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

pub async fn auth_root() -> Json<RouterProbeResponse> {
    Json(RouterProbeResponse {
        router: "authRouter",
    })
}

pub async fn user_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserInfoResponse>, ApiError> {
    let id = require_identifier(&id, "Id")?;

    match state.repository.fetch_profile_by_id(id).await.map_err(query_error)? {
        Some(profile) => Ok(Json(UserInfoResponse::from_profile(profile))),
        None => {
            tracing::warn!("Lookup failed for unknown user id {:?}", id);
            Err(ApiError::Unauthorized(id.to_string()))
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<UserInfoResponse>, ApiError> {
    let id = require_identifier(&request.id, "Id")?;

    let profile = state
        .repository
        .fetch_profile_by_id(id)
        .await
        .map_err(query_error)?
        .filter(|p| verify_password(&request.password, &p.password_hash));

    match profile {
        Some(profile) => {
            tracing::info!("User {} logged in", profile.id);
            Ok(Json(UserInfoResponse::from_profile(profile)))
        }
        None => {
            tracing::warn!("Authentication failed for {:?}", id);
            Err(ApiError::Unauthorized(id.to_string()))
        }
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ProfileUpdateRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = require_identifier(&id, "Id")?;

    if request.password.as_deref() == Some("") {
        return Err(ApiError::BadRequest("Password must not be empty.".to_string()));
    }

    let changes = ProfileChanges {
        password_hash: request.password.as_deref().map(hash_password),
        champion: request.champion,
    };
    if changes.is_empty() {
        return Err(ApiError::BadRequest(
            "Nothing to update: provide password or champion.".to_string(),
        ));
    }

    let rows = state
        .repository
        .update_profile(id, &changes)
        .await
        .map_err(query_error)?;
    if rows == 0 {
        return Err(ApiError::NotFound(format!("user {}", id)));
    }

    tracing::info!("Profile of {} updated", id);
    Ok(Json(StatusResponse::ok(format!(
        "Profile of {} updated successfully.",
        id
    ))))
}

pub async fn match_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ApiQuery(params): ApiQuery<HistoryParams>,
) -> Result<Json<Vec<MatchRecord>>, ApiError> {
    let name = require_identifier(&name, "Name")?;
    let limit = params
        .limit
        .unwrap_or(state.config.ranking.history_limit)
        .clamp(1, 100);

    let matches = state
        .repository
        .fetch_match_history(name, limit)
        .await
        .map_err(query_error)?;
    Ok(Json(matches))
}

fn query_error(err: StorageError) -> ApiError {
    ApiError::Query(err.to_string())
}
