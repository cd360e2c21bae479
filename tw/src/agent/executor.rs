//! Transport-facing wrapper around an endpoint

use std::sync::Arc;

use tracing::{debug, warn};

use super::endpoint::AgentEndpoint;
use super::error::AgentError;
use super::spec::AgentSpec;
use crate::config::LlmConfig;
use crate::domain::AgentKind;
use crate::llm::LlmClient;
use crate::prompts::{PromptError, PromptLoader};

/// Session used when the caller supplies no context id
pub const DEFAULT_SESSION: &str = "default_session";

/// Executes transport requests against one agent
#[derive(Clone)]
pub struct AgentExecutor {
    endpoint: Arc<AgentEndpoint>,
}

impl AgentExecutor {
    pub fn new(endpoint: Arc<AgentEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Wire up an agent of `kind` from its prompt and the model settings
    pub fn for_kind(
        kind: AgentKind,
        llm: Arc<dyn LlmClient>,
        prompts: &PromptLoader,
        llm_config: &LlmConfig,
    ) -> Result<Self, PromptError> {
        debug!(%kind, "AgentExecutor::for_kind: called");
        let spec = AgentSpec::load(kind, prompts)?;
        let endpoint = AgentEndpoint::new(spec, llm)
            .with_max_tokens(llm_config.max_tokens)
            .with_temperature(llm_config.temperature);
        Ok(Self::new(Arc::new(endpoint)))
    }

    pub fn kind(&self) -> AgentKind {
        self.endpoint.kind()
    }

    pub fn endpoint(&self) -> &AgentEndpoint {
        &self.endpoint
    }

    /// Run a query and return the reply text sent back over the wire
    pub async fn execute(&self, query: &str, context_id: Option<&str>) -> Result<String, AgentError> {
        let session_id = context_id.filter(|id| !id.is_empty()).unwrap_or(DEFAULT_SESSION);
        debug!(kind = %self.kind(), %session_id, "AgentExecutor::execute: called");
        let outcome = self.endpoint.invoke(query, session_id).await?;
        Ok(outcome.to_wire_json())
    }

    /// Cancellation is always refused
    pub async fn cancel(&self, task_id: &str) -> Result<(), AgentError> {
        warn!(kind = %self.kind(), %task_id, "AgentExecutor::cancel: rejected");
        Err(AgentError::CancelNotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentSpec;
    use crate::llm::ScriptedLlmClient;

    fn executor(llm: Arc<ScriptedLlmClient>) -> AgentExecutor {
        AgentExecutor::new(Arc::new(AgentEndpoint::new(AgentSpec::builtin(AgentKind::Budget), llm)))
    }

    #[tokio::test]
    async fn test_missing_context_uses_default_session() {
        let exec = executor(Arc::new(ScriptedLlmClient::texts(["nope", "nope"])));
        exec.execute("Rome", None).await.unwrap();
        exec.execute("Rome", Some("")).await.unwrap();

        let sessions = exec.endpoint().sessions();
        assert!(sessions.contains(DEFAULT_SESSION).await);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_execute_returns_pretty_error_payload() {
        let exec = executor(Arc::new(ScriptedLlmClient::texts(["not json at all"])));
        let text = exec.execute("Rome", Some("ctx-1")).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["error"], "Failed to generate structured budget");
        assert_eq!(value["raw_content"], "not json at all");
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_for_kind_uses_prompt_and_config() {
        let config = LlmConfig {
            max_tokens: 1024,
            ..Default::default()
        };
        let llm = Arc::new(ScriptedLlmClient::texts(Vec::<String>::new()));
        let exec = AgentExecutor::for_kind(AgentKind::Weather, llm, &PromptLoader::embedded_only(), &config).unwrap();
        assert_eq!(exec.kind(), AgentKind::Weather);
        assert!(exec.endpoint().spec().instruction.contains("weather"));
    }

    #[tokio::test]
    async fn test_cancel_not_supported() {
        let exec = executor(Arc::new(ScriptedLlmClient::texts(Vec::<String>::new())));
        let err = exec.cancel("task-1").await.unwrap_err();
        assert!(matches!(err, AgentError::CancelNotSupported));
        assert_eq!(err.to_string(), "cancel not supported");
    }
}
