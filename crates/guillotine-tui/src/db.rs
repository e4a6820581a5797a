// SQLite persistence: key-value app state and the HTTP response cache.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// SQLite-backed store shared by the season selection and the Sleeper client.
pub struct Database {
    conn: Mutex<Connection>,
}

/// A cached HTTP response body and when it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Whether the entry is younger than `ttl_secs` at `now`.
    pub fn is_fresh(&self, ttl_secs: u64, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        age.num_seconds() >= 0 && (age.num_seconds() as u64) < ttl_secs
    }
}

impl Database {
    /// Open (or create) a database at `path` and ensure all tables exist.
    /// Pass `":memory:"` for an ephemeral database (useful for tests).
    pub fn open(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create database directory {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS app_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS http_cache (
                url        TEXT PRIMARY KEY,
                body       TEXT NOT NULL,
                fetched_at TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock).
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Persist a JSON value under `key`, replacing any previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let json_str = serde_json::to_string(value).context("failed to serialize state value")?;
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
                params![key, json_str],
            )
            .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let json_str: Option<String> = self
            .conn()
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query app state")?;

        json_str
            .map(|s| serde_json::from_str(&s).context("failed to deserialize state value"))
            .transpose()
    }

    /// Store a response body for `url`, stamped with `fetched_at`.
    pub fn put_cached(&self, url: &str, body: &str, fetched_at: DateTime<Utc>) -> Result<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO http_cache (url, body, fetched_at) VALUES (?1, ?2, ?3)",
                params![url, body, fetched_at.to_rfc3339()],
            )
            .context("failed to write http cache entry")?;
        Ok(())
    }

    /// Fetch the cached response for `url`, fresh or not.
    pub fn get_cached(&self, url: &str) -> Result<Option<CachedResponse>> {
        let row: Option<(String, String)> = self
            .conn()
            .query_row(
                "SELECT body, fetched_at FROM http_cache WHERE url = ?1",
                params![url],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("failed to read http cache entry")?;

        let Some((body, stamp)) = row else {
            return Ok(None);
        };
        let fetched_at = DateTime::parse_from_rfc3339(&stamp)
            .with_context(|| format!("bad cache timestamp {stamp:?} for {url}"))?
            .with_timezone(&Utc);
        Ok(Some(CachedResponse { body, fetched_at }))
    }

    /// Drop every cached response. Returns the number of rows removed.
    pub fn clear_cache(&self) -> Result<usize> {
        let removed = self
            .conn()
            .execute("DELETE FROM http_cache", [])
            .context("failed to clear http cache")?;
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    #[test]
    fn open_creates_tables() {
        let db = test_db();
        let conn = db.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tables, vec!["app_state", "http_cache"]);
    }

    #[test]
    fn state_round_trip_and_overwrite() {
        let db = test_db();
        assert!(db.load_state("selected_season").unwrap().is_none());
        db.save_state("selected_season", &json!(2024)).unwrap();
        db.save_state("selected_season", &json!(2025)).unwrap();
        assert_eq!(db.load_state("selected_season").unwrap(), Some(json!(2025)));
    }

    #[test]
    fn cache_entries_keep_timestamp() {
        let db = test_db();
        let now = Utc::now();
        db.put_cached("http://x/league/1", "{\"a\":1}", now).unwrap();
        let cached = db.get_cached("http://x/league/1").unwrap().unwrap();
        assert_eq!(cached.body, "{\"a\":1}");
        assert_eq!(cached.fetched_at.timestamp(), now.timestamp());
        assert!(db.get_cached("http://x/other").unwrap().is_none());
    }

    #[test]
    fn freshness_respects_ttl() {
        let now = Utc::now();
        let entry = CachedResponse {
            body: String::new(),
            fetched_at: now - Duration::seconds(100),
        };
        assert!(entry.is_fresh(300, now));
        assert!(!entry.is_fresh(60, now));
    }

    #[test]
    fn clear_cache_removes_everything() {
        let db = test_db();
        let now = Utc::now();
        db.put_cached("a", "1", now).unwrap();
        db.put_cached("b", "2", now).unwrap();
        assert_eq!(db.clear_cache().unwrap(), 2);
        assert!(db.get_cached("a").unwrap().is_none());
    }
}
