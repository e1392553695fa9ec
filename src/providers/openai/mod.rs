//! OpenAI Chat Completions and Embeddings client.

mod client;
pub mod types;

pub use client::{OpenAIProvider, DEFAULT_BASE_URL};
