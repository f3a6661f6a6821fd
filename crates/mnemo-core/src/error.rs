//! Error types for the pipeline crate.

use mnemo_memory::MemoryError;
use mnemo_protocol::CompletionError;
use mnemo_retrieval::RetrievalError;
use mnemo_storage::StorageError;
use thiserror::Error;

/// Errors returned by pipeline operations.
///
/// `Busy` is the only retryable kind; everything else aborts the current
/// invocation and is surfaced to the caller without internal retries.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Message is empty or whitespace; rejected before any processing.
    #[error("message is empty")]
    EmptyInput,
    /// Admission gate already held; retry later.
    #[error("pipeline busy")]
    Busy,
    /// Storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// Memory service or sentiment backend failed.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    /// Embedding backend or ranking failed.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),
    /// Completion backend failed.
    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),
}

impl PipelineError {
    /// Whether the caller may retry the request as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::Busy)
    }
}
