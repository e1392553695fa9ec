//! In-memory chat and embedding models for driving `OpenAIService` in tests.

#![allow(dead_code)]

use futures::channel::mpsc;
use futures::stream::{self, StreamExt};
use openai_service::{
    ChatModel, ChatRequest, ChatResponse, ChatSettings, ChatStream, Embedding, EmbeddingModel,
    EmbeddingRequest, EmbeddingResponse, Error, Generation, Message, OpenAIService,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a [`FakeChatModel`] answers to a single-shot call.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    /// Reply with the user message of the request, prefixed with `echo: `.
    Echo,
    /// A result that carries no text.
    NoText,
    /// A response without any result.
    NoResult,
    Fail(String),
}

/// One partial of a scripted stream.
#[derive(Debug, Clone)]
pub enum Partial {
    Text(&'static str),
    NoText,
    Fail(&'static str),
}

/// Sets its flag when dropped.
struct ReleaseGuard(Arc<AtomicBool>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub struct FakeChatModel {
    reply: Reply,
    partials: Vec<Partial>,
    hang_after_partials: bool,
    open_error: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
    stream_calls: AtomicUsize,
    released: Arc<AtomicBool>,
}

impl FakeChatModel {
    pub fn replying(reply: Reply) -> Self {
        Self {
            reply,
            partials: Vec::new(),
            hang_after_partials: false,
            open_error: None,
            requests: Mutex::new(Vec::new()),
            stream_calls: AtomicUsize::new(0),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn streaming(partials: Vec<Partial>) -> Self {
        Self {
            partials,
            ..Self::replying(Reply::NoResult)
        }
    }

    /// Keep the stream open after the scripted partials instead of ending it.
    pub fn hanging(mut self) -> Self {
        self.hang_after_partials = true;
        self
    }

    /// Fail when the stream is opened.
    pub fn failing_to_open(mut self, message: &str) -> Self {
        self.open_error = Some(message.to_string());
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    /// Whether the last opened stream has been dropped.
    pub fn stream_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn record(&self, request: &ChatRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

fn user_text(request: &ChatRequest) -> String {
    request
        .messages
        .iter()
        .find_map(|m| match m {
            Message::User(text) => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn to_partial(partial: Partial) -> Result<ChatResponse, Error> {
    match partial {
        Partial::Text(text) => Ok(ChatResponse::single(Generation::text(text))),
        Partial::NoText => Ok(ChatResponse::single(Generation::empty())),
        Partial::Fail(message) => Err(Error::streaming(message)),
    }
}

#[async_trait::async_trait]
impl ChatModel for FakeChatModel {
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse, Error> {
        self.record(request);
        match &self.reply {
            Reply::Text(text) => Ok(ChatResponse::single(Generation::text(text.clone()))),
            Reply::Echo => {
                let input = user_text(request);
                // Spread completions out so concurrent calls interleave.
                tokio::time::sleep(Duration::from_millis((input.len() % 7) as u64)).await;
                Ok(ChatResponse::single(Generation::text(format!("echo: {input}"))))
            }
            Reply::NoText => Ok(ChatResponse::single(Generation::empty())),
            Reply::NoResult => Ok(ChatResponse::default()),
            Reply::Fail(message) => Err(Error::provider("Fake", message.clone())),
        }
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, Error> {
        self.record(request);
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.open_error {
            return Err(Error::provider("Fake", message.clone()));
        }

        self.released.store(false, Ordering::SeqCst);
        let guard = ReleaseGuard(Arc::clone(&self.released));
        let scripted = stream::unfold(
            (self.partials.clone().into_iter(), guard),
            |(mut rest, guard)| async move {
                let next = rest.next()?;
                Some((to_partial(next), (rest, guard)))
            },
        );

        if self.hang_after_partials {
            Ok(scripted.chain(stream::pending()).boxed())
        } else {
            Ok(scripted.boxed())
        }
    }
}

/// A chat model whose stream is fed by hand through a channel.
pub struct ChannelChatModel {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<Result<ChatResponse, Error>>>>,
}

impl ChannelChatModel {
    pub fn new() -> (Self, mpsc::UnboundedSender<Result<ChatResponse, Error>>) {
        let (sender, receiver) = mpsc::unbounded();
        let model = Self {
            receiver: Mutex::new(Some(receiver)),
        };
        (model, sender)
    }
}

#[async_trait::async_trait]
impl ChatModel for ChannelChatModel {
    async fn call(&self, _request: &ChatRequest) -> Result<ChatResponse, Error> {
        Err(Error::provider("Channel", "single-shot calls are not scripted"))
    }

    async fn stream(&self, _request: &ChatRequest) -> Result<ChatStream, Error> {
        let receiver = self
            .receiver
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| Error::provider("Channel", "stream already taken"))?;
        Ok(receiver.boxed())
    }
}

pub struct FakeEmbeddingModel {
    vectors: HashMap<String, Vec<f32>>,
    fail_with: Option<String>,
    requests: Mutex<Vec<EmbeddingRequest>>,
}

impl FakeEmbeddingModel {
    pub fn with_vectors(vectors: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: vectors
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.clone()))
                .collect(),
            fail_with: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::with_vectors(&[])
        }
    }

    pub fn requests(&self) -> Vec<EmbeddingRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl EmbeddingModel for FakeEmbeddingModel {
    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse, Error> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(message) = &self.fail_with {
            return Err(Error::provider("Fake", message.clone()));
        }

        let embeddings = request
            .inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let vector = self
                    .vectors
                    .get(input)
                    .cloned()
                    .ok_or_else(|| Error::provider("Fake", format!("no vector for '{input}'")))?;
                Ok(Embedding { index, vector })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(EmbeddingResponse {
            model: request.options.model().to_string(),
            embeddings,
            usage: None,
        })
    }
}

pub fn service_with(
    chat: Arc<dyn ChatModel>,
    embeddings: Arc<dyn EmbeddingModel>,
) -> OpenAIService {
    OpenAIService::new(chat, embeddings, ChatSettings::default())
}

pub fn chat_service(chat: Arc<dyn ChatModel>) -> OpenAIService {
    service_with(chat, Arc::new(FakeEmbeddingModel::with_vectors(&[])))
}

pub fn embedding_service(embeddings: Arc<dyn EmbeddingModel>) -> OpenAIService {
    service_with(Arc::new(FakeChatModel::replying(Reply::NoResult)), embeddings)
}
