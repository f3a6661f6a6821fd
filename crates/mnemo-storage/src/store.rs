//! Storage contract consumed by the memory service and pipeline.

use crate::error::StorageError;
use crate::model::{GlobalStats, MemoryRecord, MemoryTier, Role, TierStats, Turn};
use chrono::{DateTime, Utc};
use mnemo_protocol::{MemoryId, TurnId, UserId};

/// Persistent store for conversation turns and memory records.
///
/// Every operation is transactional per call; no cross-call transactions
/// are assumed by callers.
pub trait ConversationStore: Send + Sync {
    /// Create the user row if it does not exist yet.
    fn ensure_user(&self, user_id: UserId) -> Result<(), StorageError>;

    /// Append a turn, returning its storage-assigned id.
    fn append_turn(
        &self,
        user_id: UserId,
        role: Role,
        content: &str,
        segmented_content: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<TurnId, StorageError>;

    /// Append a turn together with its memory record and back-link in a
    /// single transaction, so no partial turn/record pair is ever visible.
    #[allow(clippy::too_many_arguments)]
    fn append_turn_with_memory(
        &self,
        user_id: UserId,
        role: Role,
        content: &str,
        segmented_content: Option<&str>,
        timestamp: DateTime<Utc>,
        importance_score: f64,
        tier: MemoryTier,
    ) -> Result<(TurnId, MemoryId), StorageError>;

    /// Read the full ordered history for a user, oldest to newest.
    fn read_history(&self, user_id: UserId) -> Result<Vec<Turn>, StorageError>;

    /// Set the memory back-link on a turn.
    fn set_memory_link(&self, turn_id: TurnId, memory_id: MemoryId) -> Result<(), StorageError>;

    /// Insert a memory record for an existing turn.
    fn insert_memory_record(&self, record: &MemoryRecord) -> Result<(), StorageError>;

    /// Delete memory records by id, returning how many were removed.
    fn delete_memory_records(&self, ids: &[MemoryId]) -> Result<usize, StorageError>;

    /// Count memory records in a tier for a user.
    fn count_by_tier(&self, user_id: UserId, tier: MemoryTier) -> Result<u64, StorageError>;

    /// Oldest short-term records for a user by creation time ascending.
    fn oldest_short_term(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, StorageError>;

    /// Per-tier aggregates for one user.
    fn tier_stats(&self, user_id: UserId) -> Result<Vec<TierStats>, StorageError>;

    /// Store-wide aggregates across all users.
    fn global_stats(&self) -> Result<GlobalStats, StorageError>;
}
