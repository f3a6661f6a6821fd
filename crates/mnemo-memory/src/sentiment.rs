//! Sentiment backend contract and a bounded result cache.

use crate::error::MemoryError;
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Default capacity of the sentiment result cache.
pub const DEFAULT_SENTIMENT_CACHE_SIZE: usize = 1000;

/// Sentiment backends only see a bounded prefix of long messages.
const MAX_CLASSIFIED_CHARS: usize = 512;

/// Language hint forwarded to the sentiment backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageHint {
    /// Chinese text.
    Zh,
    /// English or other whitespace-tokenized text.
    En,
}

impl LanguageHint {
    /// Wire name for the hint.
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageHint::Zh => "zh",
            LanguageHint::En => "en",
        }
    }
}

/// Sentiment label with model confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    /// Label emitted by the backend (e.g. positive/negative/neutral).
    pub label: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

#[async_trait]
/// Opaque "text to sentiment label" collaborator.
pub trait SentimentBackend: Send + Sync {
    /// Classify a text, returning a label and confidence.
    async fn classify(&self, text: &str, hint: LanguageHint) -> Result<Sentiment, MemoryError>;
}

type CacheKey = (String, LanguageHint);

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, Sentiment>,
    order: VecDeque<CacheKey>,
}

/// Capacity-bounded cache in front of a sentiment backend.
///
/// Entries are keyed by the truncated text and language hint and evicted
/// FIFO once the capacity is reached, so cache behavior is testable
/// independent of the classifier that consumes it.
pub struct CachedSentiment {
    inner: Arc<dyn SentimentBackend>,
    capacity: usize,
    state: Mutex<CacheState>,
}

impl CachedSentiment {
    /// Wrap a backend with a cache of the given capacity (minimum 1).
    pub fn new(inner: Arc<dyn SentimentBackend>, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cache_key(text: &str, hint: LanguageHint) -> CacheKey {
        let truncated: String = text.chars().take(MAX_CLASSIFIED_CHARS).collect();
        (truncated, hint)
    }
}

#[async_trait]
impl SentimentBackend for CachedSentiment {
    /// Classify through the cache, consulting the backend only on a miss.
    async fn classify(&self, text: &str, hint: LanguageHint) -> Result<Sentiment, MemoryError> {
        let key = Self::cache_key(text, hint);
        if let Some(hit) = self.state.lock().entries.get(&key).cloned() {
            debug!("sentiment cache hit (hint={}, text_len={})", hint.as_str(), key.0.len());
            return Ok(hit);
        }

        let sentiment = self.inner.classify(&key.0, hint).await?;

        let mut state = self.state.lock();
        if !state.entries.contains_key(&key) {
            if state.entries.len() >= self.capacity
                && let Some(evicted) = state.order.pop_front()
            {
                state.entries.remove(&evicted);
            }
            state.order.push_back(key.clone());
            state.entries.insert(key, sentiment.clone());
        }
        Ok(sentiment)
    }
}

#[cfg(test)]
mod tests {
    use super::{CachedSentiment, LanguageHint, Sentiment, SentimentBackend};
    use crate::error::MemoryError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        calls: AtomicUsize,
    }

    impl CountingBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SentimentBackend for CountingBackend {
        async fn classify(&self, text: &str, _hint: LanguageHint) -> Result<Sentiment, MemoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Sentiment {
                label: "neutral".to_string(),
                confidence: text.len() as f64 / 100.0,
            })
        }
    }

    #[tokio::test]
    async fn repeated_classify_hits_cache() {
        let backend = CountingBackend::new();
        let cached = CachedSentiment::new(backend.clone(), 10);

        let first = cached.classify("hello", LanguageHint::En).await.expect("classify");
        let second = cached.classify("hello", LanguageHint::En).await.expect("classify");
        assert_eq!(first, second);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn language_hint_is_part_of_the_key() {
        let backend = CountingBackend::new();
        let cached = CachedSentiment::new(backend.clone(), 10);

        cached.classify("你好", LanguageHint::Zh).await.expect("classify");
        cached.classify("你好", LanguageHint::En).await.expect("classify");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn capacity_bound_holds_with_fifo_eviction() {
        let backend = CountingBackend::new();
        let cached = CachedSentiment::new(backend.clone(), 2);

        cached.classify("a", LanguageHint::En).await.expect("classify");
        cached.classify("b", LanguageHint::En).await.expect("classify");
        cached.classify("c", LanguageHint::En).await.expect("classify");
        assert_eq!(cached.len(), 2);

        // "a" was evicted first, so classifying it again misses
        cached.classify("a", LanguageHint::En).await.expect("classify");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn long_text_is_truncated_before_classification() {
        let backend = CountingBackend::new();
        let cached = CachedSentiment::new(backend.clone(), 10);

        let long = "x".repeat(600);
        let sentiment = cached.classify(&long, LanguageHint::En).await.expect("classify");
        // backend saw at most 512 chars
        assert!((sentiment.confidence - 5.12).abs() < 1e-9);

        // any text sharing the 512-char prefix is the same cache entry
        let longer = "x".repeat(700);
        cached.classify(&longer, LanguageHint::En).await.expect("classify");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }
}
