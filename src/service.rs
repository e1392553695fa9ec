//! The public facade: single-shot completion, streamed completion and
//! embeddings behind three calls.

use crate::config::{ChatSettings, ServiceConfig};
use crate::provider::{ChatModel, EmbeddingModel};
use crate::response::text_fragments;
use crate::{
    ChatRequest, ChatResponse, EmbeddingOptions, EmbeddingRequest, Error, OpenAIProvider, Prompt,
    TextStream,
};
use futures_util::stream::{self, TryStreamExt};
use std::sync::Arc;

/// Stateless facade over a chat model and an embedding model.
///
/// Every call builds its own request; nothing is kept between calls, so a
/// single instance (or its clones) can serve any number of concurrent callers.
/// Provider errors are returned exactly as the provider reported them.
#[derive(Clone)]
pub struct OpenAIService {
    chat_model: Arc<dyn ChatModel>,
    embedding_model: Arc<dyn EmbeddingModel>,
    chat: ChatSettings,
}

impl OpenAIService {
    pub fn new(
        chat_model: Arc<dyn ChatModel>,
        embedding_model: Arc<dyn EmbeddingModel>,
        chat: ChatSettings,
    ) -> Self {
        Self {
            chat_model,
            embedding_model,
            chat,
        }
    }

    /// Build a service backed by the OpenAI HTTP API.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let provider = Arc::new(OpenAIProvider::new_with_base_url(
            config.api_key.clone(),
            config.base_url.clone(),
        )?);
        Ok(Self::new(provider.clone(), provider, config.chat.clone()))
    }

    /// Build a service from `OPENAI_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_config(&ServiceConfig::from_env()?)
    }

    pub fn chat_settings(&self) -> &ChatSettings {
        &self.chat
    }

    fn chat_request(&self, text: &str) -> ChatRequest {
        ChatRequest::new(Prompt::scaffold(text), self.chat.options())
    }

    /// Send `text` as a single chat request and return the full response.
    pub async fn complete_response(&self, text: &str) -> Result<ChatResponse, Error> {
        let request = self.chat_request(text);
        tracing::debug!(
            model = %request.options.model(),
            input_len = text.len(),
            "chat completion"
        );
        self.chat_model.call(&request).await
    }

    /// Send `text` as a single chat request and return the generated text.
    ///
    /// A result without text (for example a refusal) yields an empty string; a
    /// response with no result at all is [`Error::EmptyResponse`].
    pub async fn complete(&self, text: &str) -> Result<String, Error> {
        let response = self.complete_response(text).await?;
        let generation = response
            .generations
            .into_iter()
            .next()
            .ok_or(Error::EmptyResponse)?;
        Ok(generation.text.unwrap_or_default())
    }

    /// Stream the reply to `text` as text fragments.
    ///
    /// Nothing is sent until the returned stream is first polled. Partial
    /// responses without text are skipped. Dropping the stream early closes
    /// the provider stream.
    pub fn complete_stream(&self, text: &str) -> TextStream {
        let model = Arc::clone(&self.chat_model);
        let request = self.chat_request(text);
        let input_len = text.len();

        let partials = stream::once(async move {
            tracing::debug!(
                model = %request.options.model(),
                input_len,
                "streaming chat completion"
            );
            model.stream(&request).await
        })
        .try_flatten();

        text_fragments(partials)
    }

    /// Embed each of `texts` with `model`, returning one vector per input in
    /// input order. An empty input returns an empty list without calling the
    /// provider.
    pub async fn embed<I, S>(&self, texts: I, model: &str) -> Result<Vec<Vec<f32>>, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inputs: Vec<String> = texts.into_iter().map(Into::into).collect();
        if inputs.is_empty() {
            tracing::debug!(%model, "no inputs to embed");
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest::new(inputs, EmbeddingOptions::new(model));
        tracing::debug!(%model, inputs = request.inputs.len(), "embedding");

        let response = self.embedding_model.embed(&request).await?;
        Ok(response.into_vectors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = ServiceConfig::new("sk-test")
            .with_chat_model("gpt-4o-mini")
            .with_temperature(0.1);
        let service = OpenAIService::from_config(&config).unwrap();

        assert_eq!(service.chat_settings().model, "gpt-4o-mini");
        assert_eq!(service.chat_settings().temperature, 0.1);

        let request = service.chat_request("Hello");
        assert_eq!(request.messages, Prompt::scaffold("Hello").into_messages());
        assert_eq!(request.options.model(), "gpt-4o-mini");
    }
}
