//! SQLite-backed repository.
//!
//! Tables mirror the historical MySQL schema: `userinfo` holds profiles and
//! `matches` holds one row per finished match. Winner/loser are stored by
//! player name, and every name comparison is exact (BINARY collation).

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use tracing::{debug, info};

use super::{ImportData, MatchRepository, StorageError};
use crate::models::{Contribution, MatchRecord, MatchRole, ProfileChanges, UserProfile};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS userinfo (
    name     TEXT NOT NULL,
    id       TEXT PRIMARY KEY,
    password TEXT NOT NULL,
    champion TEXT NOT NULL DEFAULT '',
    tier     TEXT NOT NULL,
    winrate  REAL NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS matches (
    match_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    winner     TEXT NOT NULL,
    loser      TEXT NOT NULL,
    winscore   INTEGER NOT NULL CHECK (winscore >= 0),
    losescore  INTEGER NOT NULL CHECK (losescore >= 0),
    match_date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_matches_winner ON matches (winner);
CREATE INDEX IF NOT EXISTS idx_matches_loser ON matches (loser);
";

const PROFILE_COLUMNS: &str = "name, id, password, champion, tier, winrate";

const MATCH_COLUMNS: &str = "match_id, winner, loser, winscore, losescore, match_date";

/// Repository over a sqlx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open (creating if needed) the database at `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        info!("Connected to {}", url);
        Ok(Self { pool })
    }

    /// A private in-memory database with the schema already applied.
    ///
    /// Each SQLite memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.migrate().await?;
        Ok(repo)
    }

    /// Create tables and indexes if they are missing.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        debug!("Schema up to date");
        Ok(())
    }

    /// Insert a profile, replacing any existing profile with the same id.
    pub async fn insert_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        insert_profile_with(&mut conn, profile).await
    }

    /// Insert a match and return its assigned id.
    pub async fn insert_match(&self, record: &MatchRecord) -> Result<i64, StorageError> {
        let mut conn = self.pool.acquire().await?;
        insert_match_with(&mut conn, record).await
    }

    /// Load an import file's profiles and matches in one transaction.
    ///
    /// Returns `(profiles, matches)` inserted.
    pub async fn import(&self, data: ImportData) -> Result<(usize, usize), StorageError> {
        let mut tx = self.pool.begin().await?;

        let profile_count = data.profiles.len();
        for new in data.profiles {
            insert_profile_with(&mut tx, &new.into_profile()).await?;
        }

        for record in &data.matches {
            insert_match_with(&mut tx, record).await?;
        }

        tx.commit().await?;
        info!(
            "Imported {} profiles and {} matches",
            profile_count,
            data.matches.len()
        );
        Ok((profile_count, data.matches.len()))
    }
}

async fn insert_profile_with(
    conn: &mut SqliteConnection,
    profile: &UserProfile,
) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO userinfo (name, id, password, champion, tier, winrate)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             password = excluded.password,
             champion = excluded.champion,
             tier = excluded.tier,
             winrate = excluded.winrate",
    )
    .bind(&profile.name)
    .bind(&profile.id)
    .bind(&profile.password_hash)
    .bind(&profile.champion)
    .bind(&profile.tier)
    .bind(profile.winrate)
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_match_with(
    conn: &mut SqliteConnection,
    record: &MatchRecord,
) -> Result<i64, StorageError> {
    let result = sqlx::query(
        "INSERT INTO matches (winner, loser, winscore, losescore, match_date)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&record.winner_name)
    .bind(&record.loser_name)
    .bind(record.win_score)
    .bind(record.lose_score)
    .bind(record.match_date)
    .execute(conn)
    .await?;
    Ok(result.last_insert_rowid())
}

fn to_points(value: i64, column: &str) -> Result<u64, StorageError> {
    u64::try_from(value)
        .map_err(|_| StorageError::InvalidData(format!("negative sum in {}: {}", column, value)))
}

#[async_trait]
impl MatchRepository for SqliteRepository {
    async fn fetch_contribution(
        &self,
        name: &str,
        role: MatchRole,
    ) -> Result<Contribution, StorageError> {
        // Column names come from MatchRole, never from user input.
        let sql = format!(
            "SELECT COALESCE(SUM({scored}), 0), COALESCE(SUM({conceded}), 0)
             FROM matches WHERE {who} = ?",
            scored = role.scored_column(),
            conceded = role.conceded_column(),
            who = role.name_column(),
        );

        let (scored, conceded): (i64, i64) = sqlx::query_as(&sql)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        debug!(name, ?role, scored, conceded, "Fetched contribution");

        Ok(Contribution {
            scored: to_points(scored, role.scored_column())?,
            conceded: to_points(conceded, role.conceded_column())?,
        })
    }

    async fn write_winrate(&self, name: &str, winrate: f64) -> Result<u64, StorageError> {
        let result = sqlx::query("UPDATE userinfo SET winrate = ? WHERE name = ?")
            .bind(winrate)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn fetch_all_profiles(&self) -> Result<Vec<UserProfile>, StorageError> {
        let sql = format!("SELECT {} FROM userinfo ORDER BY tier, name", PROFILE_COLUMNS);
        let profiles = sqlx::query_as::<_, UserProfile>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    async fn fetch_top_profiles(&self, limit: u32) -> Result<Vec<UserProfile>, StorageError> {
        let sql = format!(
            "SELECT {} FROM userinfo ORDER BY tier, name LIMIT ?",
            PROFILE_COLUMNS
        );
        let profiles = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    async fn fetch_profile_by_id(&self, id: &str) -> Result<Option<UserProfile>, StorageError> {
        let sql = format!("SELECT {} FROM userinfo WHERE id = ?", PROFILE_COLUMNS);
        let profile = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "UPDATE userinfo
             SET password = COALESCE(?, password), champion = COALESCE(?, champion)
             WHERE id = ?",
        )
        .bind(changes.password_hash.as_deref())
        .bind(changes.champion.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn fetch_match_history(
        &self,
        name: &str,
        limit: u32,
    ) -> Result<Vec<MatchRecord>, StorageError> {
        let sql = format!(
            "SELECT {} FROM matches WHERE winner = ? OR loser = ?
             ORDER BY match_date DESC, match_id DESC LIMIT ?",
            MATCH_COLUMNS
        );
        let matches = sqlx::query_as::<_, MatchRecord>(&sql)
            .bind(name)
            .bind(name)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(matches)
    }
}
