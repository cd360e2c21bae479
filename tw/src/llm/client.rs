//! LlmClient trait definition

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{CompletionRequest, CompletionResponse, LlmError, StreamChunk};

/// The model capability behind every agent
///
/// Implementations are stateless; conversation continuity is carried in
/// the request's message list by the caller. Callers issue at most one
/// request at a time per logical session.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Streaming completion
    ///
    /// Sends chunks to the provided channel as they arrive and returns the
    /// final complete response. A closed receiver does not abort the call.
    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError>;
}
