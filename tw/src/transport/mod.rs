//! Transport boundary between the orchestrator and the agents
//!
//! The orchestrator only ever sees `call(kind, query, session_id) -> text`.
//! [`LocalTransport`] dispatches to in-process executors, [`HttpTransport`]
//! speaks A2A JSON-RPC to agents running as separate servers.

mod http;
mod local;

use async_trait::async_trait;
use thiserror::Error;

use crate::agent::AgentError;
use crate::domain::AgentKind;

pub use http::HttpTransport;
pub use local::LocalTransport;

/// Errors crossing the transport boundary
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("No agent registered for {0}")]
    UnknownAgent(AgentKind),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Agent returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Agent error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("Invalid reply: {0}")]
    InvalidReply(String),
}

/// Request/response channel to the four agents
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Send a query to an agent within a session and return its reply text
    async fn call(&self, kind: AgentKind, query: &str, session_id: &str) -> Result<String, TransportError>;
}
