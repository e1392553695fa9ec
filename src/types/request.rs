use serde::{Deserialize, Serialize};

use super::message::Message;
use super::options::{ChatOptions, EmbeddingOptions};
use super::prompt::Prompt;

/// A chat request: ordered messages paired with the options for this call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

impl ChatRequest {
    pub fn new(prompt: Prompt, options: ChatOptions) -> Self {
        Self {
            messages: prompt.into_messages(),
            options,
        }
    }
}

/// An embedding request: the texts to embed, in order, and the model to use.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRequest {
    pub inputs: Vec<String>,
    pub options: EmbeddingOptions,
}

impl EmbeddingRequest {
    pub fn new(inputs: Vec<String>, options: EmbeddingOptions) -> Self {
        Self { inputs, options }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
