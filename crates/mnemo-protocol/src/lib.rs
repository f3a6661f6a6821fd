//! Shared protocol types for the mnemo pipeline and its backends.

mod chat;
mod completion;

pub use chat::{ChatMessage, ChatRole};
pub use completion::{Completion, CompletionBackend, CompletionError};

use uuid::Uuid;

/// Unique identifier for a user, assigned by the serving layer.
pub type UserId = i64;
/// Unique identifier for a conversation turn, assigned by storage.
pub type TurnId = i64;
/// Unique identifier for a memory record.
pub type MemoryId = Uuid;
