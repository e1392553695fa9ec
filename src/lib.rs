//! A small uniform facade over OpenAI chat completion, streaming chat and
//! text embeddings.
//!
//! [`OpenAIService`] exposes three calls, `complete`, `complete_stream` and
//! `embed`, and hides the provider's request and response shapes behind them.
//! The provider itself sits behind the [`ChatModel`] and [`EmbeddingModel`]
//! traits, with [`OpenAIProvider`] as the HTTP implementation.

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;
pub mod response;
pub mod service;
pub mod sse_stream;
pub mod types;

// Re-export core types for easy usage
pub use config::{ChatSettings, ServiceConfig};
pub use error::Error;
pub use provider::{ChatModel, EmbeddingModel};
pub use providers::*;
pub use response::*;
pub use service::OpenAIService;
pub use sse_stream::SseEvent;
pub use types::*;
