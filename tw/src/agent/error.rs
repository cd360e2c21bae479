//! Agent error types

use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced by an agent at the transport boundary
///
/// Parse and validation problems never show up here; they are encoded in
/// the reply as an error payload.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("cancel not supported")]
    CancelNotSupported,
}
