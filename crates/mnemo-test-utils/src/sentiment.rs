use async_trait::async_trait;
use mnemo_memory::{LanguageHint, MemoryError, Sentiment, SentimentBackend};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sentiment backend returning a fixed label and confidence.
pub struct FixedSentiment {
    label: String,
    confidence: f64,
    calls: AtomicUsize,
}

impl FixedSentiment {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `classify` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentBackend for FixedSentiment {
    async fn classify(&self, _text: &str, _hint: LanguageHint) -> Result<Sentiment, MemoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Sentiment {
            label: self.label.clone(),
            confidence: self.confidence,
        })
    }
}
