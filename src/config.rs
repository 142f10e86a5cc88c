//! Environment-driven configuration for a review session.

use std::time::Duration;

/// Model endpoint configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model: String,
    pub endpoint: String,
}

/// Session-level knobs for the review orchestrator.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub model: ModelConfig,
    /// Minimum pause between reviews of the same document.
    pub cooldown: Duration,
    /// Source tag stamped onto emitted diagnostics records.
    pub source_tag: String,
}

impl ReviewConfig {
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "qwen3:8b".to_string());
        let cooldown_secs = std::env::var("REVIEW_COOLDOWN_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let source_tag =
            std::env::var("REVIEW_SOURCE_TAG").unwrap_or_else(|_| "ai-review".to_string());

        ReviewConfig {
            model: ModelConfig { model, endpoint },
            cooldown: Duration::from_secs(cooldown_secs),
            source_tag,
        }
    }
}
