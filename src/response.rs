//! Response handling for chat and embedding calls.
//!
//! A single-shot chat call and a streamed chat call produce the same
//! [`ChatResponse`] type: the former exactly once, the latter once per partial
//! result. Callers only ever see one of two shapes, a `String` or a
//! [`TextStream`] of fragments, and the helpers here perform that mapping.

use crate::{Error, FinishReason, Usage};
use futures_util::future;
use futures_util::stream::{Stream, StreamExt};
use std::pin::Pin;

/// A stream of (partial) chat responses as delivered by a provider.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatResponse, Error>> + Send>>;

/// A stream of text fragments.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, Error>> + Send>>;

/// One generated result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    /// Generated text. `None` when the result carried no text, e.g. a role-only
    /// stream delta or the trailing usage chunk of a stream.
    pub text: Option<String>,
    pub finish_reason: Option<FinishReason>,
}

impl Generation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            finish_reason: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }
}

/// A complete chat response, or one partial response of a stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub generations: Vec<Generation>,
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Create a response carrying a single generation.
    pub fn single(generation: Generation) -> Self {
        Self {
            generations: vec![generation],
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// The first generation, if any.
    pub fn result(&self) -> Option<&Generation> {
        self.generations.first()
    }

    /// Text of the first generation. `None` if there is no generation or it has
    /// no text.
    pub fn text(&self) -> Option<&str> {
        self.result().and_then(|g| g.text.as_deref())
    }

    /// Consume the response, returning the text of the first generation.
    pub fn into_text(self) -> Option<String> {
        self.generations.into_iter().next().and_then(|g| g.text)
    }
}

/// Map a stream of partial responses to their text, dropping every partial that
/// has no text.
///
/// Order is preserved. The first error is yielded and ends the stream; nothing
/// is polled from the source after that. Dropping the returned stream drops the
/// source.
pub fn text_fragments<S>(responses: S) -> TextStream
where
    S: Stream<Item = Result<ChatResponse, Error>> + Send + 'static,
{
    let fragments = responses
        .filter_map(|item| {
            future::ready(match item {
                Ok(response) => response.into_text().map(Ok),
                Err(e) => Some(Err(e)),
            })
        })
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        });

    Box::pin(fragments)
}

/// One embedding vector and its position in the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub index: usize,
    pub vector: Vec<f32>,
}

/// Result of an embedding call. Embeddings are kept in the order the provider
/// returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingResponse {
    pub model: String,
    pub embeddings: Vec<Embedding>,
    pub usage: Option<Usage>,
}

impl EmbeddingResponse {
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Extract the vectors, in response order.
    pub fn into_vectors(self) -> Vec<Vec<f32>> {
        self.embeddings.into_iter().map(|e| e.vector).collect()
    }
}
