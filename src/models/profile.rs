//! User profile model and its client-facing projections.

use serde::{Deserialize, Serialize};

use super::{display_tier, hash_password};

/// A stored user profile (one row of `userinfo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    /// Display name, also the key used by match records
    pub name: String,

    /// Unique login identifier
    pub id: String,

    /// Raw tier code as stored (may be an internal code)
    pub tier: String,

    /// Winrate percentage (0.0 to 100.0)
    pub winrate: f64,

    /// Favourite champion
    #[serde(default)]
    pub champion: String,

    /// Hex SHA-256 of the password. Never serialized.
    #[serde(skip_serializing, default)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// Fixed projection returned by the top ranking endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProfile {
    pub name: String,
    pub id: String,
    pub champion: String,
    pub tier: String,
    pub winrate: f64,
}

impl From<&UserProfile> for RankedProfile {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            id: profile.id.clone(),
            champion: profile.champion.clone(),
            tier: display_tier(&profile.tier).to_string(),
            winrate: profile.winrate,
        }
    }
}

/// A profile as supplied by an import file, with a plaintext password.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub name: String,
    pub id: String,
    pub tier: String,
    #[serde(default)]
    pub champion: String,
    pub password: String,
}

impl NewProfile {
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            password_hash: hash_password(&self.password),
            name: self.name,
            id: self.id,
            tier: self.tier,
            winrate: 0.0,
            champion: self.champion,
        }
    }
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub password_hash: Option<String>,
    pub champion: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none() && self.champion.is_none()
    }
}
