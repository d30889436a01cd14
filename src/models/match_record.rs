//! Match record model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::MatchRole;

/// One finished match between two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchRecord {
    /// Row identifier assigned by the store
    #[serde(default)]
    pub match_id: i64,

    /// Name of the player who won
    #[serde(rename = "winner")]
    #[sqlx(rename = "winner")]
    pub winner_name: String,

    /// Name of the player who lost
    #[serde(rename = "loser")]
    #[sqlx(rename = "loser")]
    pub loser_name: String,

    /// Points scored by the winner
    #[sqlx(rename = "winscore")]
    pub win_score: u32,

    /// Points scored by the loser
    #[sqlx(rename = "losescore")]
    pub lose_score: u32,

    /// When the match was played
    pub match_date: NaiveDateTime,
}

impl MatchRecord {
    /// The role `name` played in this match, if any. Names compare exactly.
    pub fn role_of(&self, name: &str) -> Option<MatchRole> {
        if self.winner_name == name {
            Some(MatchRole::Winner)
        } else if self.loser_name == name {
            Some(MatchRole::Loser)
        } else {
            None
        }
    }

    /// Points (scored, conceded) from the perspective of `role`.
    pub fn points_for(&self, role: MatchRole) -> (u32, u32) {
        match role {
            MatchRole::Winner => (self.win_score, self.lose_score),
            MatchRole::Loser => (self.lose_score, self.win_score),
        }
    }
}
