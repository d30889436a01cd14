//! REST API endpoints.
//!
//! Axum-based HTTP API for the ranking board, winrate updates,
//! profile lookup/update and match history.

pub mod extract;
pub mod routes;
pub mod state;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::RankingError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Incorrect query or SQL disconnect: {0}")]
    Query(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", m.clone()),
            ApiError::Query(_) => (
                StatusCode::BAD_REQUEST,
                "QUERY_ERROR",
                "Incorrect query or SQL disconnect.".to_string(),
            ),
            ApiError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Incorrect username or password.".to_string(),
            ),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, "NOT_FOUND", m.clone()),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal Server Error.".to_string(),
            ),
        };

        if status.is_server_error() || matches!(self, ApiError::Query(_)) {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            status: "error",
            message,
            error: ErrorDetail {
                code: code.to_string(),
                detail: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RankingError> for ApiError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::Validation(m) => ApiError::BadRequest(m),
            RankingError::Query(e) => ApiError::Query(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// CORS layer allowing `origin`, or any origin for `"*"`.
///
/// An origin that is not a valid header value allows no cross-origin
/// requests at all. `AppConfig::validate` rejects such values up front.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origin == "*" {
        return layer.allow_origin(Any);
    }

    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            tracing::error!(
                "Invalid CORS origin {:?} ({}), cross-origin requests disabled",
                origin,
                e
            );
            layer
        }
    }
}

/// Account routes, mounted under `/auth` and its `/user` alias.
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::user::auth_root))
        .route("/info/:id", get(routes::user::user_info))
        .route("/login", post(routes::user::login))
        .route("/profile/:id", put(routes::user::update_profile))
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/", get(routes::root))
        .route("/ranking", get(routes::ranking::list_rankings))
        .route("/ranking/rank", get(routes::ranking::top_rankings))
        .route(
            "/ranking/updateWinrate/:name",
            put(routes::ranking::update_winrate),
        )
        .nest("/auth", account_routes())
        .nest("/user", account_routes())
        .route("/matches/:name", get(routes::user::match_history))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
