//! Completion backend contract.

use crate::chat::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by a completion backend.
#[derive(Debug, Error)]
#[error("completion backend error: {0}")]
pub struct CompletionError(pub String);

/// Response produced by a completion backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Assistant reply content.
    pub content: String,
    /// Optional reasoning trace emitted alongside the reply.
    pub reasoning: Option<String>,
}

impl Completion {
    /// Build a completion with no reasoning trace.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            reasoning: None,
        }
    }
}

#[async_trait]
/// Opaque "generate completion from message list" collaborator.
pub trait CompletionBackend: Send + Sync {
    /// Produce a completion for the given message list.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, CompletionError>;
}
