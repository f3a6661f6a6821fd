//! Configuration models and file loading for the mnemo pipeline.
//!
//! This crate owns the config schema, the programmatic builder, and the
//! JSON5 loader with field-path validation.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Config file loading entry points.
pub use loader::{load_config, validate};
/// Configuration schema models.
pub use model::*;
