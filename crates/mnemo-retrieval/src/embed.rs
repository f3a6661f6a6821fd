//! Text vectorization over an embedding backend.

use crate::error::RetrievalError;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

#[async_trait]
/// Opaque "text list to vector list" collaborator.
///
/// Implementations must be deterministic for identical input; everything
/// else about the encoding is opaque to the pipeline.
pub trait EmbeddingBackend: Send + Sync {
    /// Encode a batch of texts into fixed-dimension vectors, index-aligned
    /// with the input.
    async fn encode(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>, RetrievalError>;
}

/// Batches text through an embedding backend, dropping non-embeddable input.
#[derive(Clone)]
pub struct Vectorizer {
    /// Backend performing the actual encoding.
    backend: Arc<dyn EmbeddingBackend>,
}

impl Vectorizer {
    /// Create a vectorizer over the given backend.
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self { backend }
    }

    /// Embed the non-blank entries of `texts`.
    ///
    /// Blank entries are filtered out before encoding, so the output is
    /// index-aligned with the *filtered* input; callers that need a stable
    /// mapping onto the original slice must validate entries up front.
    /// Backend failures are propagated without retry.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let filtered: Vec<String> = texts
            .iter()
            .filter(|text| !text.trim().is_empty())
            .cloned()
            .collect();
        if filtered.is_empty() {
            return Ok(Vec::new());
        }
        let expected = filtered.len();
        let vectors = self.backend.encode(filtered).await?;
        if vectors.len() != expected {
            return Err(RetrievalError::CountMismatch {
                expected,
                actual: vectors.len(),
            });
        }
        debug!("embedded batch (count={})", vectors.len());
        Ok(vectors)
    }
}
