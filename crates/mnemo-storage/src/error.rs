//! Error types for storage operations.

use mnemo_protocol::{TurnId, UserId};

/// Errors returned by conversation stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Referenced user does not exist.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),
    /// Referenced turn does not exist.
    #[error("unknown turn: {0}")]
    UnknownTurn(TurnId),
    /// A stored column held a value the model cannot represent.
    #[error("invalid stored value: {0}")]
    InvalidValue(String),
}
