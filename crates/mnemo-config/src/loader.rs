//! JSON5 config loading and validation.

use crate::error::ConfigError;
use crate::model::MnemoConfig;
use log::info;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load and validate a config file.
///
/// The file is parsed as JSON5 (plain JSON is valid JSON5), decoded into
/// the schema, and validated field by field.
pub fn load_config(path: impl AsRef<Path>) -> Result<MnemoConfig, ConfigError> {
    let raw = fs::read_to_string(path.as_ref())?;
    let value: Value = json5::from_str(&raw)?;
    let config: MnemoConfig = serde_json::from_value(value)?;
    validate(&config)?;
    info!("loaded config (path={})", path.as_ref().display());
    Ok(config)
}

/// Validate a config, returning the first offending field.
pub fn validate(config: &MnemoConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.memory.importance_threshold) {
        return Err(invalid(
            "memory.importance_threshold",
            "must be within [0.0, 1.0]",
        ));
    }
    if config.memory.short_term_limit == 0 {
        return Err(invalid("memory.short_term_limit", "must be at least 1"));
    }
    if config.memory.sentiment_cache_size == 0 {
        return Err(invalid("memory.sentiment_cache_size", "must be at least 1"));
    }
    if !(-1.0..=1.0).contains(&config.retrieval.similarity_threshold) {
        return Err(invalid(
            "retrieval.similarity_threshold",
            "must be within [-1.0, 1.0]",
        ));
    }
    if config.retrieval.top_k == 0 {
        return Err(invalid("retrieval.top_k", "must be at least 1"));
    }
    if config.pipeline.max_concurrent == 0 {
        return Err(invalid("pipeline.max_concurrent", "must be at least 1"));
    }
    Ok(())
}

fn invalid(path: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.to_string(),
    }
}
