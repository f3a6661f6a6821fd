//! Configuration schema for the mnemo pipeline.

use serde::{Deserialize, Serialize};

/// Root config for the mnemo engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MnemoConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl MnemoConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> MnemoConfigBuilder {
        MnemoConfigBuilder::new()
    }
}

/// Builder for assembling a `MnemoConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct MnemoConfigBuilder {
    config: MnemoConfig,
}

impl MnemoConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: MnemoConfig::default(),
        }
    }

    /// Replace the memory configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the retrieval configuration.
    pub fn retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.config.retrieval = retrieval;
        self
    }

    /// Replace the context configuration.
    pub fn context(mut self, context: ContextConfig) -> Self {
        self.config.context = context;
        self
    }

    /// Replace the pipeline configuration.
    pub fn pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.config.pipeline = pipeline;
        self
    }

    /// Finish building.
    pub fn build(self) -> MnemoConfig {
        self.config
    }
}

/// Memory classification and retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Ceiling on short-term records per user.
    #[serde(default = "default_short_term_limit")]
    pub short_term_limit: usize,
    /// Score at or above which a message is retained long-term.
    #[serde(default = "default_importance_threshold")]
    pub importance_threshold: f64,
    /// Capacity of the sentiment result cache.
    #[serde(default = "default_sentiment_cache_size")]
    pub sentiment_cache_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_limit: default_short_term_limit(),
            importance_threshold: default_importance_threshold(),
            sentiment_cache_size: default_sentiment_cache_size(),
        }
    }
}

/// Semantic retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Minimum cosine similarity for a historical turn to be retained.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Maximum number of relevance-selected turns.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            top_k: default_top_k(),
        }
    }
}

/// Context window assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Number of recent turns collected as complete user/assistant pairs.
    #[serde(default = "default_recency_window")]
    pub recency_window: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            recency_window: default_recency_window(),
        }
    }
}

/// Pipeline admission-control settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum concurrently admitted pipeline invocations.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_short_term_limit() -> usize {
    10
}

fn default_importance_threshold() -> f64 {
    0.7
}

fn default_sentiment_cache_size() -> usize {
    1000
}

fn default_similarity_threshold() -> f32 {
    0.6
}

fn default_top_k() -> usize {
    5
}

fn default_recency_window() -> usize {
    4
}

fn default_max_concurrent() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::{MemoryConfig, MnemoConfig, PipelineConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_reference_values() {
        let config = MnemoConfig::default();
        assert_eq!(config.memory.short_term_limit, 10);
        assert_eq!(config.memory.importance_threshold, 0.7);
        assert_eq!(config.memory.sentiment_cache_size, 1000);
        assert_eq!(config.retrieval.similarity_threshold, 0.6);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.context.recency_window, 4);
        assert_eq!(config.pipeline.max_concurrent, 1);
    }

    #[test]
    fn builder_replaces_sections() {
        let config = MnemoConfig::builder()
            .memory(MemoryConfig {
                short_term_limit: 3,
                ..MemoryConfig::default()
            })
            .pipeline(PipelineConfig { max_concurrent: 4 })
            .build();
        assert_eq!(config.memory.short_term_limit, 3);
        assert_eq!(config.pipeline.max_concurrent, 4);
        assert_eq!(config.retrieval.top_k, 5);
    }
}
