use crate::{ChatRequest, ChatResponse, ChatStream, EmbeddingRequest, EmbeddingResponse, Error};

/// A chat model endpoint that can answer either in one piece or as a stream of
/// partial responses.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync + 'static {
    /// Issue one request and wait for the complete response.
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse, Error>;

    /// Issue one streaming request. Each item is a partial response; dropping
    /// the stream releases the underlying connection.
    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, Error>;
}

/// An embedding model endpoint.
#[async_trait::async_trait]
pub trait EmbeddingModel: Send + Sync + 'static {
    /// Embed every input of the request, returning one embedding per input in
    /// input order.
    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse, Error>;
}
