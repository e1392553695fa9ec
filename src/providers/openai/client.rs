use super::types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, EmbeddingsRequest,
    EmbeddingsResponse, OpenAIError, OpenAIMessage, StreamOptions,
};
use crate::provider::{ChatModel, EmbeddingModel};
use crate::sse_stream::{SseEvent, SseStreamExt};
use crate::{
    ChatRequest, ChatResponse, ChatStream, Embedding, EmbeddingRequest, EmbeddingResponse, Error,
    FinishReason, Generation, Message,
};
use futures_util::{future, StreamExt};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Base URL of the public OpenAI API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const PROVIDER: &str = "OpenAI";

/// OpenAI provider implementation.
///
/// Cheap to clone; clones share the underlying connection pool. Only a connect
/// timeout is set so long streams are not cut off.
#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    pub fn new(api_key: String) -> Result<Self, Error> {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new OpenAI provider with custom base URL.
    pub fn new_with_base_url(api_key: String, base_url: String) -> Result<Self, Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn convert_request(request: &ChatRequest, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.options.model().to_string(),
            messages: request.messages.iter().map(Self::convert_message).collect(),
            temperature: request.options.temperature(),
            stream: stream.then_some(true),
            stream_options: stream.then_some(StreamOptions {
                include_usage: true,
            }),
        }
    }

    fn convert_message(message: &Message) -> OpenAIMessage {
        OpenAIMessage {
            role: message.role().as_str(),
            content: message.text().to_string(),
        }
    }

    fn convert_response(response: ChatCompletionResponse) -> ChatResponse {
        let generations = response
            .choices
            .into_iter()
            .map(|choice| {
                if let Some(refusal) = &choice.message.refusal {
                    tracing::debug!(%refusal, "model refused the request");
                }
                Generation {
                    text: choice.message.content,
                    finish_reason: choice.finish_reason.as_deref().map(parse_finish_reason),
                }
            })
            .collect();

        ChatResponse {
            generations,
            usage: response.usage,
        }
    }

    fn convert_chunk(chunk: ChatCompletionChunk) -> ChatResponse {
        let generations = chunk
            .choices
            .into_iter()
            .map(|choice| Generation {
                text: choice.delta.content,
                finish_reason: choice.finish_reason.as_deref().map(parse_finish_reason),
            })
            .collect();

        ChatResponse {
            generations,
            usage: chunk.usage,
        }
    }

    /// Decode one SSE event of a chat stream. Unparseable payloads are skipped;
    /// an error payload ends the stream with a provider error.
    fn convert_stream_event(event: SseEvent) -> Option<Result<ChatResponse, Error>> {
        match serde_json::from_str::<ChatCompletionChunk>(&event.data) {
            Ok(chunk) => Some(Ok(Self::convert_chunk(chunk))),
            Err(parse_error) => {
                if let Ok(api_error) = serde_json::from_str::<OpenAIError>(&event.data) {
                    return Some(Err(Error::provider(PROVIDER, api_error.error.message)));
                }
                tracing::warn!(
                    error = %parse_error,
                    data = %event.data,
                    "skipping unparseable stream event"
                );
                None
            }
        }
    }

    /// POST a JSON body and fail on any non-success status.
    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, Error> {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(%url, "sending request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        tracing::debug!(%url, status = response.status().as_u16(), "response received");
        Ok(response)
    }

    async fn error_from_response(response: reqwest::Response) -> Error {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return e.into(),
        };

        let message = serde_json::from_str::<OpenAIError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        tracing::warn!(status = status.as_u16(), %message, "OpenAI request failed");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::auth(message),
            StatusCode::TOO_MANY_REQUESTS => Error::rate_limit(message),
            _ => Error::provider(PROVIDER, format!("API error ({status}): {message}")),
        }
    }
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "tool_calls" => FinishReason::ToolCalls,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Other,
    }
}

#[async_trait::async_trait]
impl ChatModel for OpenAIProvider {
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse, Error> {
        let body = Self::convert_request(request, false);
        let response: ChatCompletionResponse =
            self.post("chat/completions", &body).await?.json().await?;
        Ok(Self::convert_response(response))
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, Error> {
        let body = Self::convert_request(request, true);
        let response = self.post("chat/completions", &body).await?;

        let partials = response
            .bytes_stream()
            .sse_events()
            .filter_map(|event| {
                future::ready(match event {
                    Ok(event) => Self::convert_stream_event(event),
                    Err(e) => Some(Err(e)),
                })
            });

        Ok(Box::pin(partials))
    }
}

#[async_trait::async_trait]
impl EmbeddingModel for OpenAIProvider {
    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse, Error> {
        let body = EmbeddingsRequest {
            model: request.options.model(),
            input: &request.inputs,
            encoding_format: "float",
        };
        let response: EmbeddingsResponse = self.post("embeddings", &body).await?.json().await?;

        Ok(EmbeddingResponse {
            model: response.model,
            embeddings: response
                .data
                .into_iter()
                .map(|data| Embedding {
                    index: data.index,
                    vector: data.embedding,
                })
                .collect(),
            usage: response.usage,
        })
    }
}
