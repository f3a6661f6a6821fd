use async_trait::async_trait;
use mnemo_protocol::{ChatMessage, Completion, CompletionBackend, CompletionError};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// Completion backend returning a fixed reply.
#[derive(Debug, Clone)]
pub struct FixedCompletion {
    response: String,
}

impl FixedCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for FixedCompletion {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<Completion, CompletionError> {
        Ok(Completion::new(self.response.clone()))
    }
}

/// Completion backend that records the last message list it was handed.
#[derive(Debug, Clone)]
pub struct RecordingCompletion {
    response: String,
    pub last_messages: Arc<Mutex<Vec<ChatMessage>>>,
}

impl RecordingCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            last_messages: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl CompletionBackend for RecordingCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, CompletionError> {
        *self.last_messages.lock() = messages.to_vec();
        Ok(Completion::new(self.response.clone()))
    }
}

/// Completion backend that blocks until released, for in-flight tests.
pub struct PendingCompletion {
    entered: Notify,
    gate: Notify,
    response: String,
}

impl PendingCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            entered: Notify::new(),
            gate: Notify::new(),
            response: response.into(),
        }
    }

    /// Wait until a `complete` call has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Allow one pending `complete` call to finish.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl CompletionBackend for PendingCompletion {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<Completion, CompletionError> {
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(Completion::new(self.response.clone()))
    }
}

/// Completion backend that always fails.
#[derive(Debug, Clone)]
pub struct FailingCompletion {
    message: String,
}

impl FailingCompletion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for FailingCompletion {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<Completion, CompletionError> {
        Err(CompletionError(self.message.clone()))
    }
}
