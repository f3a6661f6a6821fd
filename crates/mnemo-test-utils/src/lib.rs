//! Test helpers shared across mnemo crates.

pub mod completion;
pub mod embed;
pub mod sentiment;

pub use completion::{FailingCompletion, FixedCompletion, PendingCompletion, RecordingCompletion};
pub use embed::{FailingEmbedder, StubEmbedder};
pub use sentiment::FixedSentiment;
