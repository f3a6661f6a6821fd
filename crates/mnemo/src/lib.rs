//! Public SDK surface for mnemo.
//!
//! This crate re-exports the building blocks of the context assembly and
//! memory lifecycle engine and provides a small initialization helper to
//! keep consumer setup consistent.

/// Re-export for convenience.
pub use mnemo_config as config;
pub use mnemo_core as core;
/// Re-export for convenience.
pub use mnemo_memory as memory;
/// Re-export for convenience.
pub use mnemo_protocol as protocol;
/// Re-export for convenience.
pub use mnemo_retrieval as retrieval;
/// Re-export for convenience.
pub use mnemo_storage as storage;

pub use mnemo_config::MnemoConfig;
pub use mnemo_core::{Pipeline, PipelineError};
pub use mnemo_storage::SqliteStore;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
