//! A2A JSON-RPC client transport

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{AgentTransport, TransportError};
use crate::a2a::{
    A2aMessage, JsonRpcId, JsonRpcRequest, JsonRpcResponse, METHOD_MESSAGE_SEND, MessageSendParams,
};
use crate::agent::AgentCard;
use crate::config::Config;
use crate::domain::AgentKind;

/// Talks to agents served by `tw agent` / `tw serve`
pub struct HttpTransport {
    http: reqwest::Client,
    urls: HashMap<AgentKind, String>,
}

impl HttpTransport {
    /// Agents at the public URLs from config
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let urls = AgentKind::ALL
            .into_iter()
            .map(|kind| (kind, config.agents.public_url(kind)))
            .collect();
        Self::with_urls(urls, Duration::from_millis(config.llm.timeout_ms))
    }

    /// Agents at explicit base URLs
    pub fn with_urls(urls: HashMap<AgentKind, String>, timeout: Duration) -> Result<Self, TransportError> {
        debug!(agents = urls.len(), ?timeout, "HttpTransport::with_urls: called");
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, urls })
    }

    fn url(&self, kind: AgentKind) -> Result<&str, TransportError> {
        self.urls
            .get(&kind)
            .map(String::as_str)
            .ok_or(TransportError::UnknownAgent(kind))
    }

    /// Fetch an agent's discovery document
    pub async fn discover(&self, kind: AgentKind) -> Result<AgentCard, TransportError> {
        let url = format!("{}/.well-known/agent-card.json", self.url(kind)?.trim_end_matches('/'));
        debug!(%kind, %url, "HttpTransport::discover: called");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

/// Pull the reply text out of a JSON-RPC response
fn reply_text(response: JsonRpcResponse) -> Result<String, TransportError> {
    if let Some(error) = response.error {
        return Err(TransportError::Remote {
            code: error.code,
            message: error.message,
        });
    }
    let result = response
        .result
        .ok_or_else(|| TransportError::InvalidReply("response has neither result nor error".to_string()))?;
    let message: A2aMessage =
        serde_json::from_value(result).map_err(|e| TransportError::InvalidReply(e.to_string()))?;
    message
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| TransportError::InvalidReply("reply message has no text part".to_string()))
}

#[async_trait]
impl AgentTransport for HttpTransport {
    async fn call(&self, kind: AgentKind, query: &str, session_id: &str) -> Result<String, TransportError> {
        let url = self.url(kind)?;
        debug!(%kind, %url, %session_id, "HttpTransport::call: called");

        let params = MessageSendParams {
            message: A2aMessage::user_text(query, Some(session_id.to_string())),
            configuration: None,
            metadata: None,
        };
        let params = serde_json::to_value(&params).map_err(|e| TransportError::InvalidReply(e.to_string()))?;
        let request = JsonRpcRequest::new(
            JsonRpcId::String(uuid::Uuid::now_v7().to_string()),
            METHOD_MESSAGE_SEND,
            params,
        );

        let response = self.http.post(url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%kind, %status, "HttpTransport::call: agent returned error status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: JsonRpcResponse = response.json().await?;
        reply_text(response)
    }
}
