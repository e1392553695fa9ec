//! Immutable per-call option records.

/// Chat model used when none is configured.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-mini";

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Options for a chat call. Built fresh for every call and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    model: String,
    temperature: f64,
}

impl ChatOptions {
    pub fn new(model: impl Into<String>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_MODEL, DEFAULT_TEMPERATURE)
    }
}

/// Options for an embedding call. The model is always supplied by the caller
/// and is only validated by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingOptions {
    model: String,
}

impl EmbeddingOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
