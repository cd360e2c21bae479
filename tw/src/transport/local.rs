//! In-process transport

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{AgentTransport, TransportError};
use crate::agent::AgentExecutor;
use crate::config::LlmConfig;
use crate::domain::AgentKind;
use crate::llm::LlmClient;
use crate::prompts::{PromptError, PromptLoader};

/// Dispatches calls straight to executors in this process
#[derive(Clone, Default)]
pub struct LocalTransport {
    agents: HashMap<AgentKind, AgentExecutor>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All four agents sharing one model client
    pub fn from_client(
        llm: Arc<dyn LlmClient>,
        prompts: &PromptLoader,
        llm_config: &LlmConfig,
    ) -> Result<Self, PromptError> {
        debug!("LocalTransport::from_client: called");
        let mut transport = Self::new();
        for kind in AgentKind::ALL {
            transport.insert(AgentExecutor::for_kind(kind, llm.clone(), prompts, llm_config)?);
        }
        Ok(transport)
    }

    pub fn insert(&mut self, executor: AgentExecutor) {
        self.agents.insert(executor.kind(), executor);
    }

    pub fn with_agent(mut self, executor: AgentExecutor) -> Self {
        self.insert(executor);
        self
    }

    pub fn executor(&self, kind: AgentKind) -> Option<&AgentExecutor> {
        self.agents.get(&kind)
    }
}

#[async_trait]
impl AgentTransport for LocalTransport {
    async fn call(&self, kind: AgentKind, query: &str, session_id: &str) -> Result<String, TransportError> {
        debug!(%kind, %session_id, "LocalTransport::call: called");
        let executor = self.agents.get(&kind).ok_or(TransportError::UnknownAgent(kind))?;
        Ok(executor.execute(query, Some(session_id)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ScriptedLlmClient, ScriptedReply};

    #[tokio::test]
    async fn test_call_routes_by_kind() {
        let llm = Arc::new(ScriptedLlmClient::texts(["not json at all"]));
        let transport =
            LocalTransport::from_client(llm.clone(), &PromptLoader::embedded_only(), &LlmConfig::default()).unwrap();

        let reply = transport.call(AgentKind::Restaurant, "Lisbon", "s1").await.unwrap();
        assert!(reply.contains("Failed to generate structured restaurant recommendations"));
        assert!(llm.requests().await[0].system_prompt.contains("restaurant"));
        let sessions = transport.executor(AgentKind::Restaurant).unwrap().endpoint().sessions();
        assert!(sessions.contains("s1").await);
    }

    #[tokio::test]
    async fn test_unknown_agent() {
        let err = LocalTransport::new().call(AgentKind::Budget, "x", "s1").await.unwrap_err();
        assert!(matches!(err, TransportError::UnknownAgent(AgentKind::Budget)));
    }

    #[tokio::test]
    async fn test_model_failure_surfaces() {
        let llm = Arc::new(ScriptedLlmClient::new([ScriptedReply::Fail("down".to_string())]));
        let transport = LocalTransport::from_client(llm, &PromptLoader::embedded_only(), &LlmConfig::default()).unwrap();
        let err = transport.call(AgentKind::Weather, "Oslo", "s1").await.unwrap_err();
        assert!(matches!(err, TransportError::Agent(_)));
    }
}
