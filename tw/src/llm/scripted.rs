//! Scripted model client for offline runs and integration tests
//!
//! Replays canned replies in order and records every request it receives.
//! With partial chunks enabled each reply is first emitted as a few text
//! deltas, which lets callers check that only the final response is used.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, StreamChunk, TokenUsage};

/// One scripted step
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Final reply text
    Text(String),
    /// Model capability failure
    Fail(String),
}

/// Replays scripted replies
#[derive(Debug)]
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
    partial_chunks: bool,
}

impl ScriptedLlmClient {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            partial_chunks: false,
        }
    }

    /// Client that answers with the given texts in order
    pub fn texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(texts.into_iter().map(|t| ScriptedReply::Text(t.into())))
    }

    /// Emit misleading partial deltas before each final reply
    pub fn with_partial_chunks(mut self) -> Self {
        self.partial_chunks = true;
        self
    }

    /// Requests received so far
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_reply(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().await.push(request);
        match self.replies.lock().await.pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(message)) => {
                debug!(%message, "ScriptedLlmClient: scripted failure");
                Err(LlmError::ApiError { status: 503, message })
            }
            None => Err(LlmError::InvalidResponse("No more scripted replies".to_string())),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!("ScriptedLlmClient::complete: called");
        let text = self.next_reply(request).await?;
        Ok(CompletionResponse::text(text))
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError> {
        debug!(partial_chunks = self.partial_chunks, "ScriptedLlmClient::stream: called");
        let text = self.next_reply(request).await?;

        if self.partial_chunks {
            for partial in ["Let me think", " about this...", " {\"incomplete\":"] {
                let _ = chunk_tx.send(StreamChunk::TextDelta(partial.to_string())).await;
            }
        }
        let _ = chunk_tx
            .send(StreamChunk::MessageDone {
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
            .await;

        Ok(CompletionResponse::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records_requests() {
        let client = ScriptedLlmClient::texts(["one", "two"]);
        let (tx, _rx) = mpsc::channel(16);

        let first = client
            .stream(CompletionRequest::single("sys", "q1", 100), tx.clone())
            .await
            .unwrap();
        let second = client.complete(CompletionRequest::single("sys", "q2", 100)).await.unwrap();

        assert_eq!(first.content.as_deref(), Some("one"));
        assert_eq!(second.content.as_deref(), Some("two"));
        let requests = client.requests().await;
        assert_eq!(requests[1].messages[0].content, "q2");
    }

    #[tokio::test]
    async fn test_partial_chunks_precede_final() {
        let client = ScriptedLlmClient::texts(["final"]).with_partial_chunks();
        let (tx, mut rx) = mpsc::channel(16);

        let response = client.stream(CompletionRequest::single("sys", "q", 100), tx).await.unwrap();
        assert_eq!(response.content.as_deref(), Some("final"));

        let mut deltas = 0;
        let mut done = false;
        while let Some(chunk) = rx.recv().await {
            match chunk {
                StreamChunk::TextDelta(_) => deltas += 1,
                StreamChunk::MessageDone { .. } => done = true,
                StreamChunk::Error(_) => {}
            }
        }
        assert_eq!(deltas, 3);
        assert!(done);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let client = ScriptedLlmClient::new([ScriptedReply::Fail("overloaded".to_string())]);
        let err = client.complete(CompletionRequest::single("sys", "q", 100)).await.unwrap_err();
        assert!(matches!(err, LlmError::ApiError { status: 503, .. }));
    }
}
