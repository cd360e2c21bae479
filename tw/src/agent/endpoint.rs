//! AgentEndpoint - one model-backed skill with a fixed schema

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::spec::AgentSpec;
use crate::domain::{AgentKind, AgentOutcome};
use crate::llm::{CompletionRequest, LlmClient, LlmError, StreamChunk};
use crate::session::SessionStore;
use crate::structured;

/// Buffer for partial chunks; they are drained and dropped
const CHUNK_BUFFER: usize = 64;

/// Generic agent endpoint
///
/// Owns its session store. Each invocation makes exactly one model call and
/// funnels the reply through the structured decoder, so callers only ever
/// see a document, an error payload, or a model failure.
pub struct AgentEndpoint {
    spec: AgentSpec,
    llm: Arc<dyn LlmClient>,
    sessions: SessionStore,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl AgentEndpoint {
    pub fn new(spec: AgentSpec, llm: Arc<dyn LlmClient>) -> Self {
        let sessions = SessionStore::new(spec.kind.agent_id());
        Self {
            spec,
            llm,
            sessions,
            max_tokens: 8192,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn kind(&self) -> AgentKind {
        self.spec.kind
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Run one query in the given session
    pub async fn invoke(&self, query: &str, session_id: &str) -> Result<AgentOutcome, LlmError> {
        let kind = self.spec.kind;
        debug!(%kind, %session_id, query_len = query.len(), "AgentEndpoint::invoke: called");

        let session = self.sessions.get_or_create(session_id).await;
        let _turn = session.begin_turn().await;

        let mut messages = session.history().await;
        messages.push(crate::llm::Message::user(query));
        let request = CompletionRequest {
            system_prompt: self.spec.instruction.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let (tx, rx) = mpsc::channel(CHUNK_BUFFER);
        let (result, discarded) = tokio::join!(self.llm.stream(request, tx), drain(rx));
        let response = result.inspect_err(|e| warn!(%kind, error = %e, "AgentEndpoint::invoke: model call failed"))?;
        debug!(%kind, discarded, "AgentEndpoint::invoke: final response received");

        let reply = response.content.unwrap_or_default();
        let outcome: AgentOutcome = structured::decode(&reply, kind).into();
        session.record_turn(query, reply).await;

        info!(%kind, %session_id, ok = outcome.is_document(), "AgentEndpoint::invoke: complete");
        Ok(outcome)
    }
}

/// Consume streamed chunks until the sender side closes
async fn drain(mut rx: mpsc::Receiver<StreamChunk>) -> usize {
    let mut partials = 0;
    while let Some(chunk) = rx.recv().await {
        match chunk {
            StreamChunk::TextDelta(_) => partials += 1,
            StreamChunk::Error(e) => debug!(error = %e, "drain: stream error event"),
            StreamChunk::MessageDone { .. } => {}
        }
    }
    partials
}
