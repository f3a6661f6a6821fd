//! Memory classification, retention tiers, and eviction for mnemo.

pub mod error;
pub mod policy;
pub mod sentiment;
pub mod service;

/// Memory error type.
pub use error::MemoryError;
/// Importance scoring heuristic and tier assignment.
pub use policy::{DEFAULT_IMPORTANCE_THRESHOLD, DEFAULT_SHORT_TERM_LIMIT, ImportancePolicy};
/// Sentiment backend contract and bounded cache.
pub use sentiment::{
    CachedSentiment, DEFAULT_SENTIMENT_CACHE_SIZE, LanguageHint, Sentiment, SentimentBackend,
};
/// Recording, eviction, and stats over a conversation store.
pub use service::MemoryService;
