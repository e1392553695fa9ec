//! Service configuration.

use crate::providers::openai::DEFAULT_BASE_URL;
use crate::{ChatOptions, Error, DEFAULT_CHAT_MODEL, DEFAULT_TEMPERATURE};
use std::env;

/// Chat settings applied to every chat call of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f64,
}

impl ChatSettings {
    /// Options for one call. A fresh value is built each time.
    pub fn options(&self) -> ChatOptions {
        ChatOptions::new(self.model.clone(), self.temperature)
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Configuration for building an [`OpenAIService`](crate::OpenAIService).
#[derive(Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat: ChatSettings,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("chat", &self.chat)
            .finish()
    }
}

impl ServiceConfig {
    /// Configuration for the public OpenAI API with default chat settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            chat: ChatSettings::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.chat.temperature = temperature;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// `OPENAI_API_KEY` is required. `OPENAI_BASE_URL`, `OPENAI_CHAT_MODEL` and
    /// `OPENAI_TEMPERATURE` override the defaults when set.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::config("OPENAI_API_KEY environment variable is required"))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(model) = lookup("OPENAI_CHAT_MODEL") {
            config = config.with_chat_model(model);
        }
        if let Some(raw) = lookup("OPENAI_TEMPERATURE") {
            let temperature = raw.trim().parse::<f64>().map_err(|_| {
                Error::config(format!("OPENAI_TEMPERATURE must be a number, got '{raw}'"))
            })?;
            config = config.with_temperature(temperature);
        }

        Ok(config)
    }
}
