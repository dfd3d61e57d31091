use std::path::Path;
use std::sync::Mutex;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;
use crate::error::StoreError;
use crate::stats::{StatsKey, StatsStore};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS counters (
    member TEXT NOT NULL,
    kind TEXT NOT NULL,
    value INTEGER NOT NULL,
    PRIMARY KEY (member, kind)
);";

/// SQLite-backed stats counters. Increments run as a single upsert, so
/// concurrent duels never lose an update.
pub struct SqliteStatsStore {
    conn: Mutex<Connection>,
}

impl SqliteStatsStore {
    /// Open (or create) a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        info!(path = %path.as_ref().display(), "opening stats database");
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStatsStore { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStatsStore { conn: Mutex::new(conn) })
    }

    /// Number of stored counters.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM counters", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn to_db(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::Backend(format!("counter value {} out of range", value)))
}

fn from_db(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Backend(format!("negative counter value {}", value)))
}

#[async_trait]
impl StatsStore for SqliteStatsStore {
    async fn get_counter(&self, key: &StatsKey) -> Result<Option<u64>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let value: Option<i64> = conn
            .query_row(
                "SELECT value FROM counters WHERE member = ?1 AND kind = ?2",
                params![key.member.as_str(), key.kind.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        value.map(from_db).transpose()
    }

    async fn set_counter(&self, key: &StatsKey, value: u64) -> Result<(), StoreError> {
        let value = to_db(value)?;
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO counters (member, kind, value) VALUES (?1, ?2, ?3)",
            params![key.member.as_str(), key.kind.as_str(), value],
        )?;
        Ok(())
    }

    fn supports_atomic_increment(&self) -> bool {
        true
    }

    async fn increment(&self, key: &StatsKey, absent_base: u64) -> Result<u64, StoreError> {
        let first = to_db(absent_base)? + 1;
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let value: i64 = conn.query_row(
            "INSERT INTO counters (member, kind, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (member, kind) DO UPDATE SET value = value + 1
             RETURNING value",
            params![key.member.as_str(), key.kind.as_str(), first],
            |row| row.get(0),
        )?;
        from_db(value)
    }
}
