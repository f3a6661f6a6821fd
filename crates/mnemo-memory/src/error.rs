//! Error types for memory operations.

use mnemo_storage::StorageError;

/// Errors returned by the memory service and sentiment helpers.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Storage failure while recording or evicting.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// Sentiment backend unreachable or failed.
    #[error("sentiment backend error: {0}")]
    Backend(String),
}
