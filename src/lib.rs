//! # Arena Ranking
//!
//! Ranking and winrate backend for a 1v1 arena ladder.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (profiles, matches, stats, tiers)
//! - **storage**: Repository trait and its SQLite / in-memory implementations
//! - **calculate**: Winrate computation and ranking aggregation
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
