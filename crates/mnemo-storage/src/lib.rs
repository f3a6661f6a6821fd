//! Conversation and memory-record persistence for mnemo.
//!
//! This crate owns the durable data model (turns and their retention-tier
//! annotations) and the `ConversationStore` contract the rest of the
//! pipeline is written against. A SQLite implementation is provided; every
//! operation is transactional per call.

pub mod error;
pub mod model;
pub mod sqlite;
mod store;

/// Storage error type.
pub use error::StorageError;
/// Durable data model.
pub use model::{GlobalStats, MemoryRecord, MemoryTier, Role, TierStats, Turn};
/// SQLite-backed store implementation.
pub use sqlite::SqliteStore;
/// Storage contract consumed by the pipeline.
pub use store::ConversationStore;
