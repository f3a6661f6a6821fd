//! Semantic retrieval support: vectorization and relevance ranking.

pub mod embed;
pub mod error;
pub mod rank;

/// Embedding backend contract and batching vectorizer.
pub use embed::{EmbeddingBackend, Vectorizer};
/// Retrieval error type.
pub use error::RetrievalError;
/// Similarity ranking over embedded candidates.
pub use rank::{DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K, Ranked, RelevanceRanker, cosine_similarity};
