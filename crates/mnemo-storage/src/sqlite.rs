//! SQLite-backed conversation store.

use crate::error::StorageError;
use crate::model::{GlobalStats, MemoryRecord, MemoryTier, Role, TierStats, Turn};
use crate::store::ConversationStore;
use chrono::{DateTime, Utc};
use log::{debug, info};
use mnemo_protocol::{MemoryId, TurnId, UserId};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::Path;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY
);
CREATE TABLE IF NOT EXISTS turns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    segmented_content TEXT,
    timestamp TEXT NOT NULL,
    memory_id TEXT
);
CREATE TABLE IF NOT EXISTS memory_records (
    id TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    turn_id INTEGER NOT NULL REFERENCES turns(id),
    importance_score REAL NOT NULL,
    tier TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_turns_user_time ON turns(user_id, timestamp);
CREATE INDEX IF NOT EXISTS idx_memory_user_tier ON memory_records(user_id, tier, created_at);
";

/// Conversation store backed by a single SQLite connection.
pub struct SqliteStore {
    /// Serialized access to the connection.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        info!(
            "opened sqlite conversation store (path={})",
            path.as_ref().display()
        );
        Self::init(conn)
    }

    /// Open an in-memory store, mainly for tests.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn user_exists(conn: &Connection, user_id: UserId) -> Result<bool, StorageError> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM users WHERE id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn turn_exists(conn: &Connection, turn_id: TurnId) -> Result<bool, StorageError> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM turns WHERE id = ?1",
                params![turn_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert_turn(
        tx: &Transaction<'_>,
        user_id: UserId,
        role: Role,
        content: &str,
        segmented_content: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<TurnId, StorageError> {
        if !Self::user_exists(tx, user_id)? {
            return Err(StorageError::UnknownUser(user_id));
        }
        tx.execute(
            "INSERT INTO turns (user_id, role, content, segmented_content, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, role.as_str(), content, segmented_content, timestamp],
        )?;
        Ok(tx.last_insert_rowid())
    }

    fn insert_record(tx: &Transaction<'_>, record: &MemoryRecord) -> Result<(), StorageError> {
        tx.execute(
            "INSERT INTO memory_records (id, user_id, turn_id, importance_score, tier, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.to_string(),
                record.user_id,
                record.turn_id,
                record.importance_score,
                record.tier.as_str(),
                record.created_at,
            ],
        )?;
        Ok(())
    }
}

fn row_to_turn(row: &rusqlite::Row<'_>) -> Result<Turn, StorageError> {
    let role: String = row.get("role")?;
    let memory_id: Option<String> = row.get("memory_id")?;
    Ok(Turn {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        role: Role::parse(&role)
            .ok_or_else(|| StorageError::InvalidValue(format!("role: {role}")))?,
        content: row.get("content")?,
        segmented_content: row.get("segmented_content")?,
        timestamp: row.get("timestamp")?,
        memory_id: memory_id
            .map(|id| parse_memory_id(&id))
            .transpose()?,
    })
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<MemoryRecord, StorageError> {
    let id: String = row.get("id")?;
    let tier: String = row.get("tier")?;
    Ok(MemoryRecord {
        id: parse_memory_id(&id)?,
        user_id: row.get("user_id")?,
        turn_id: row.get("turn_id")?,
        importance_score: row.get("importance_score")?,
        tier: MemoryTier::parse(&tier)
            .ok_or_else(|| StorageError::InvalidValue(format!("tier: {tier}")))?,
        created_at: row.get("created_at")?,
    })
}

fn parse_memory_id(value: &str) -> Result<MemoryId, StorageError> {
    Uuid::parse_str(value).map_err(|_| StorageError::InvalidValue(format!("memory id: {value}")))
}

impl ConversationStore for SqliteStore {
    /// Create the user row if missing.
    fn ensure_user(&self, user_id: UserId) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR IGNORE INTO users (id) VALUES (?1)",
            params![user_id],
        )?;
        Ok(())
    }

    /// Append a turn for an existing user.
    fn append_turn(
        &self,
        user_id: UserId,
        role: Role,
        content: &str,
        segmented_content: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<TurnId, StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let turn_id = Self::insert_turn(&tx, user_id, role, content, segmented_content, timestamp)?;
        tx.commit()?;
        debug!(
            "appended turn (user_id={}, turn_id={}, role={}, content_len={})",
            user_id,
            turn_id,
            role.as_str(),
            content.len()
        );
        Ok(turn_id)
    }

    /// Append a turn, its memory record, and the back-link atomically.
    fn append_turn_with_memory(
        &self,
        user_id: UserId,
        role: Role,
        content: &str,
        segmented_content: Option<&str>,
        timestamp: DateTime<Utc>,
        importance_score: f64,
        tier: MemoryTier,
    ) -> Result<(TurnId, MemoryId), StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let turn_id = Self::insert_turn(&tx, user_id, role, content, segmented_content, timestamp)?;
        let record = MemoryRecord {
            id: Uuid::new_v4(),
            user_id,
            turn_id,
            importance_score,
            tier,
            created_at: Utc::now(),
        };
        Self::insert_record(&tx, &record)?;
        tx.execute(
            "UPDATE turns SET memory_id = ?1 WHERE id = ?2",
            params![record.id.to_string(), turn_id],
        )?;
        tx.commit()?;
        debug!(
            "appended turn with memory (user_id={}, turn_id={}, memory_id={}, tier={})",
            user_id,
            turn_id,
            record.id,
            tier.as_str()
        );
        Ok((turn_id, record.id))
    }

    /// Full history for a user, oldest to newest.
    fn read_history(&self, user_id: UserId) -> Result<Vec<Turn>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, role, content, segmented_content, timestamp, memory_id
             FROM turns WHERE user_id = ?1 ORDER BY timestamp ASC, id ASC",
        )?;
        let mut rows = stmt.query(params![user_id])?;
        let mut turns = Vec::new();
        while let Some(row) = rows.next()? {
            turns.push(row_to_turn(row)?);
        }
        Ok(turns)
    }

    /// Set the memory back-link on an existing turn.
    fn set_memory_link(&self, turn_id: TurnId, memory_id: MemoryId) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE turns SET memory_id = ?1 WHERE id = ?2",
            params![memory_id.to_string(), turn_id],
        )?;
        if updated == 0 {
            return Err(StorageError::UnknownTurn(turn_id));
        }
        Ok(())
    }

    /// Insert a memory record for an existing turn.
    fn insert_memory_record(&self, record: &MemoryRecord) -> Result<(), StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        if !Self::user_exists(&tx, record.user_id)? {
            return Err(StorageError::UnknownUser(record.user_id));
        }
        if !Self::turn_exists(&tx, record.turn_id)? {
            return Err(StorageError::UnknownTurn(record.turn_id));
        }
        Self::insert_record(&tx, record)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete memory records by id in one transaction.
    fn delete_memory_records(&self, ids: &[MemoryId]) -> Result<usize, StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut removed = 0;
        for id in ids {
            removed += tx.execute(
                "DELETE FROM memory_records WHERE id = ?1",
                params![id.to_string()],
            )?;
        }
        tx.commit()?;
        debug!("deleted memory records (requested={}, removed={})", ids.len(), removed);
        Ok(removed)
    }

    /// Count records in a tier for a user.
    fn count_by_tier(&self, user_id: UserId, tier: MemoryTier) -> Result<u64, StorageError> {
        let conn = self.conn.lock();
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM memory_records WHERE user_id = ?1 AND tier = ?2",
            params![user_id, tier.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Oldest short-term records for a user, creation time ascending.
    fn oldest_short_term(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, turn_id, importance_score, tier, created_at
             FROM memory_records WHERE user_id = ?1 AND tier = 'short_term'
             ORDER BY created_at ASC, rowid ASC LIMIT ?2",
        )?;
        let mut rows = stmt.query(params![user_id, limit as i64])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(row_to_record(row)?);
        }
        Ok(records)
    }

    /// Per-tier count and average importance for one user.
    fn tier_stats(&self, user_id: UserId) -> Result<Vec<TierStats>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT tier, COUNT(*), AVG(importance_score)
             FROM memory_records WHERE user_id = ?1 GROUP BY tier ORDER BY tier",
        )?;
        let mut rows = stmt.query(params![user_id])?;
        let mut stats = Vec::new();
        while let Some(row) = rows.next()? {
            let tier: String = row.get(0)?;
            stats.push(TierStats {
                tier: MemoryTier::parse(&tier)
                    .ok_or_else(|| StorageError::InvalidValue(format!("tier: {tier}")))?,
                count: row.get(1)?,
                avg_importance: row.get(2)?,
            });
        }
        Ok(stats)
    }

    /// Store-wide aggregates across all users.
    fn global_stats(&self) -> Result<GlobalStats, StorageError> {
        let conn = self.conn.lock();
        let stats = conn.query_row(
            "SELECT COUNT(*),
                    COUNT(CASE WHEN tier = 'short_term' THEN 1 END),
                    COUNT(CASE WHEN tier = 'long_term' THEN 1 END),
                    COALESCE(AVG(importance_score), 0.0)
             FROM memory_records",
            [],
            |row| {
                Ok(GlobalStats {
                    total: row.get(0)?,
                    short_term: row.get(1)?,
                    long_term: row.get(2)?,
                    avg_importance: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }
}
