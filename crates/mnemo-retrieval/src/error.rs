//! Error types for retrieval operations.

/// Errors returned by the vectorizer and ranker.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// Embedding backend unreachable or failed.
    #[error("embedding backend error: {0}")]
    Backend(String),
    /// Backend returned a different number of vectors than texts sent.
    #[error("embedding count mismatch: expected {expected}, got {actual}")]
    CountMismatch {
        /// Number of texts sent to the backend.
        expected: usize,
        /// Number of vectors returned.
        actual: usize,
    },
}
