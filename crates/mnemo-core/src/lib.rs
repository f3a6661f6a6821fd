//! Context assembly and pipeline orchestration for mnemo.
//!
//! This crate ties the storage, memory, and retrieval crates together into
//! the message-handling pipeline: admit, classify, record, assemble, and
//! hand the context window to the completion backend.

pub mod context;
pub mod error;
pub mod gate;
pub mod language;
pub mod pipeline;
pub mod prompt;

/// Recency/relevance context assembly.
pub use context::ContextAssembler;
/// Pipeline error type.
pub use error::PipelineError;
/// Admission control for pipeline invocations.
pub use gate::{AdmissionGate, AdmissionPermit};
/// Language detection and segmentation hooks.
pub use language::{Segmenter, is_cjk, language_hint};
/// The message-handling pipeline.
pub use pipeline::{AssembledContext, Pipeline};
