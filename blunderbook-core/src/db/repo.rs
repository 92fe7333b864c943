//! Database repository layer
//!
//! The record store keeps the whole game collection as one JSON blob. Derived
//! data (cached insight statements) lives in its own table and can be dropped
//! at any time.

use crate::analytics::SnapshotKey;
use crate::error::Result;
use crate::types::Game;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Mutex;

/// Blob key the game collection is stored under.
pub const GAMES_KEY: &str = "games";

/// Load/save boundary for the game collection.
///
/// Hosts load a snapshot once, mutate it in memory and save it back after
/// each change. The insight engine never talks to the store.
pub trait GameStore {
    /// Load every game; an empty store yields an empty collection.
    fn load(&self) -> Result<Vec<Game>>;

    /// Replace the stored collection with `games`.
    fn save(&self, games: &[Game]) -> Result<()>;
}

/// Insight statements read back from the cache.
#[derive(Debug, Clone)]
pub struct CachedInsights {
    pub insights: Vec<String>,
    pub computed_at: DateTime<Utc>,
}

/// Database handle (single connection)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Blob operations
    // ============================================

    /// Read the raw value stored under `key`.
    pub fn get_blob(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or replace the value stored under `key`.
    pub fn put_blob(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO blobs (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    // ============================================
    // Insight cache
    // ============================================

    /// Statements previously stored for `key`, if any.
    pub fn get_cached_insights(&self, key: &SnapshotKey) -> Result<Option<CachedInsights>> {
        let conn = self.conn.lock().unwrap();
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT insights, computed_at FROM insight_cache WHERE snapshot_key = ?1",
                params![key.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((insights, computed_at)) = row else {
            return Ok(None);
        };

        let computed_at = DateTime::parse_from_rfc3339(&computed_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Some(CachedInsights {
            insights: serde_json::from_str(&insights)?,
            computed_at,
        }))
    }

    /// Store statements for `key`, replacing any earlier entry.
    pub fn put_cached_insights(&self, key: &SnapshotKey, insights: &[String]) -> Result<()> {
        let json = serde_json::to_string(insights)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO insight_cache (snapshot_key, computed_at, insights)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(snapshot_key) DO UPDATE SET
                computed_at = excluded.computed_at,
                insights = excluded.insights
            "#,
            params![key.as_str(), Utc::now().to_rfc3339(), json],
        )?;
        Ok(())
    }

    /// Drop every cached entry. Returns the number of rows removed.
    pub fn clear_insight_cache(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute("DELETE FROM insight_cache", [])?;
        Ok(removed)
    }

    /// Cached statements for `games`, computing and storing them on a miss.
    pub fn insights_for(&self, games: &[Game]) -> Result<Vec<String>> {
        let key = SnapshotKey::of(games)?;
        if let Some(cached) = self.get_cached_insights(&key)? {
            tracing::debug!(key = %key, computed_at = %cached.computed_at, "Insight cache hit");
            return Ok(cached.insights);
        }

        tracing::debug!(key = %key, "Insight cache miss");
        let insights = crate::analytics::generate_insights(games);
        self.put_cached_insights(&key, &insights)?;
        Ok(insights)
    }
}

impl GameStore for Database {
    fn load(&self) -> Result<Vec<Game>> {
        let games: Vec<Game> = match self.get_blob(GAMES_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };
        tracing::debug!(games = games.len(), "Loaded games");
        Ok(games)
    }

    fn save(&self, games: &[Game]) -> Result<()> {
        let json = serde_json::to_string(games)?;
        self.put_blob(GAMES_KEY, &json)?;
        tracing::info!(games = games.len(), "Saved games");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let db = test_db();
        assert!(db.load().unwrap().is_empty());
    }

    #[test]
    fn test_blob_upsert() {
        let db = test_db();
        db.put_blob("k", "one").unwrap();
        db.put_blob("k", "two").unwrap();
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("two"));
        assert_eq!(db.get_blob("missing").unwrap(), None);
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let db = test_db();
        db.put_blob(GAMES_KEY, "{not json").unwrap();
        assert!(matches!(db.load(), Err(crate::Error::Json(_))));
    }

    #[test]
    fn test_insight_cache_round_trip() {
        let db = test_db();
        let games: Vec<Game> = Vec::new();
        let key = SnapshotKey::of(&games).unwrap();
        assert!(db.get_cached_insights(&key).unwrap().is_none());

        let first = db.insights_for(&games).unwrap();
        let cached = db.get_cached_insights(&key).unwrap().unwrap();
        assert_eq!(cached.insights, first);
        assert_eq!(db.insights_for(&games).unwrap(), first);

        assert_eq!(db.clear_insight_cache().unwrap(), 1);
        assert!(db.get_cached_insights(&key).unwrap().is_none());
    }
}
