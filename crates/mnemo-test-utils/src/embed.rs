use async_trait::async_trait;
use mnemo_retrieval::{EmbeddingBackend, RetrievalError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Embedding backend serving vectors from a fixed table.
///
/// Texts without a mapped vector encode to the zero vector, which ranks
/// below any positive similarity threshold. Backend invocations are
/// counted so tests can assert which paths skip embedding.
pub struct StubEmbedder {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    default: Vec<f32>,
    calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new() -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
            default: vec![0.0, 0.0],
            calls: AtomicUsize::new(0),
        }
    }

    /// Map `text` to a fixed vector.
    pub fn with_vector(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.lock().insert(text.into(), vector);
        self
    }

    /// Number of `encode` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingBackend for StubEmbedder {
    async fn encode(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let vectors = self.vectors.lock();
        Ok(input
            .iter()
            .map(|text| vectors.get(text).cloned().unwrap_or(self.default.clone()))
            .collect())
    }
}

/// Embedding backend that always fails.
#[derive(Debug, Clone)]
pub struct FailingEmbedder {
    message: String,
}

impl FailingEmbedder {
    pub fn new(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            message: message.into(),
        })
    }
}

#[async_trait]
impl EmbeddingBackend for FailingEmbedder {
    async fn encode(&self, _input: Vec<String>) -> Result<Vec<Vec<f32>>, RetrievalError> {
        Err(RetrievalError::Backend(self.message.clone()))
    }
}
