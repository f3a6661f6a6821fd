//! Tiered memory recording, eviction, and aggregate stats.

use crate::error::MemoryError;
use crate::policy::ImportancePolicy;
use chrono::Utc;
use log::{debug, info};
use mnemo_protocol::{MemoryId, TurnId, UserId};
use mnemo_storage::{ConversationStore, GlobalStats, MemoryRecord, MemoryTier, TierStats};
use std::sync::Arc;
use uuid::Uuid;

/// Records memory annotations and keeps the short-term tier bounded.
///
/// The eviction policy is strictly capacity-based FIFO on creation time;
/// there is no access-time tracking and tiers are never reassigned.
pub struct MemoryService {
    store: Arc<dyn ConversationStore>,
    policy: ImportancePolicy,
    short_term_limit: usize,
}

impl MemoryService {
    /// Create a service over the given store.
    pub fn new(
        store: Arc<dyn ConversationStore>,
        policy: ImportancePolicy,
        short_term_limit: usize,
    ) -> Self {
        Self {
            store,
            policy,
            short_term_limit: short_term_limit.max(1),
        }
    }

    /// The scoring policy in use.
    pub fn policy(&self) -> &ImportancePolicy {
        &self.policy
    }

    /// Configured ceiling on short-term records per user.
    pub fn short_term_limit(&self) -> usize {
        self.short_term_limit
    }

    /// Insert a memory record for an existing turn and back-link it.
    pub fn record(
        &self,
        user_id: UserId,
        turn_id: TurnId,
        importance_score: f64,
        tier: MemoryTier,
    ) -> Result<MemoryId, MemoryError> {
        let record = MemoryRecord {
            id: Uuid::new_v4(),
            user_id,
            turn_id,
            importance_score,
            tier,
            created_at: Utc::now(),
        };
        self.store.insert_memory_record(&record)?;
        self.store.set_memory_link(turn_id, record.id)?;
        debug!(
            "recorded memory (user_id={}, turn_id={}, tier={}, score={:.2})",
            user_id,
            turn_id,
            tier.as_str(),
            importance_score
        );
        Ok(record.id)
    }

    /// Evict the oldest short-term records above the ceiling, returning how
    /// many were removed. Callers run this eagerly after every short-term
    /// insert.
    pub fn enforce_short_term_limit(&self, user_id: UserId) -> Result<usize, MemoryError> {
        let count = self.store.count_by_tier(user_id, MemoryTier::ShortTerm)? as usize;
        if count <= self.short_term_limit {
            return Ok(0);
        }
        let excess = count - self.short_term_limit;
        let victims = self.store.oldest_short_term(user_id, excess)?;
        let ids: Vec<MemoryId> = victims.iter().map(|record| record.id).collect();
        let removed = self.store.delete_memory_records(&ids)?;
        info!(
            "evicted short-term memories (user_id={}, removed={}, limit={})",
            user_id, removed, self.short_term_limit
        );
        Ok(removed)
    }

    /// Per-tier count and average importance for one user.
    pub fn stats(&self, user_id: UserId) -> Result<Vec<TierStats>, MemoryError> {
        Ok(self.store.tier_stats(user_id)?)
    }

    /// Aggregate stats across all users.
    pub fn global_stats(&self) -> Result<GlobalStats, MemoryError> {
        Ok(self.store.global_stats()?)
    }
}
