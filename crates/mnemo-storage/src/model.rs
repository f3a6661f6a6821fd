//! Durable data model for conversation turns and memory records.

use chrono::{DateTime, Utc};
use mnemo_protocol::{MemoryId, TurnId, UserId};
use serde::{Deserialize, Serialize};

/// Speaker role for a recorded turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Turn authored by the user.
    User,
    /// Turn authored by the assistant.
    Assistant,
}

impl Role {
    /// Stored column value for the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a stored column value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// Retention tier assigned to a memory record at classification time.
///
/// A record never changes tier after creation; short-term records are the
/// only ones the eviction policy may delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryTier {
    /// Bounded-retention tier, evicted FIFO past the ceiling.
    ShortTerm,
    /// Unbounded-retention tier.
    LongTerm,
}

impl MemoryTier {
    /// Stored column value for the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryTier::ShortTerm => "short_term",
            MemoryTier::LongTerm => "long_term",
        }
    }

    /// Parse a stored column value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "short_term" => Some(MemoryTier::ShortTerm),
            "long_term" => Some(MemoryTier::LongTerm),
            _ => None,
        }
    }
}

/// One recorded conversational utterance.
///
/// Immutable once written, except for the `memory_id` back-link set after
/// classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Storage-assigned id, monotonic within a conversation.
    pub id: TurnId,
    /// Owning user.
    pub user_id: UserId,
    /// Speaker role.
    pub role: Role,
    /// Raw message text.
    pub content: String,
    /// Language-normalized form used for matching, when available.
    pub segmented_content: Option<String>,
    /// Recording timestamp, non-decreasing within a conversation.
    pub timestamp: DateTime<Utc>,
    /// Back-link to the memory record classifying this turn.
    pub memory_id: Option<MemoryId>,
}

/// Retention-tier annotation for a single turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Record identifier.
    pub id: MemoryId,
    /// Owning user.
    pub user_id: UserId,
    /// Turn this record classifies.
    pub turn_id: TurnId,
    /// Importance score in [0, 1] computed at classification time.
    pub importance_score: f64,
    /// Assigned retention tier.
    pub tier: MemoryTier,
    /// Creation timestamp, the eviction ordering key.
    pub created_at: DateTime<Utc>,
}

/// Per-tier aggregate for one user's memory records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    /// Tier the aggregate covers.
    pub tier: MemoryTier,
    /// Number of records in the tier.
    pub count: u64,
    /// Mean importance score across the tier.
    pub avg_importance: f64,
}

/// Store-wide aggregate across all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Total memory records.
    pub total: u64,
    /// Records in the short-term tier.
    pub short_term: u64,
    /// Records in the long-term tier.
    pub long_term: u64,
    /// Mean importance score across all records, 0.0 when empty.
    pub avg_importance: f64,
}
