//! Model capability for Tripweave agents
//!
//! Provides completion requests against OpenAI or Gemini, plus a scripted
//! client for offline use.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod openai;
mod scripted;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use scripted::{ScriptedLlmClient, ScriptedReply};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, StreamChunk, TokenUsage};

use crate::config::{LlmConfig, Provider};

/// Create an LLM client for the configured provider
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model(), "create_client: called");
    match config.provider {
        Provider::Gemini => Ok(Arc::new(GeminiClient::from_config(config)?)),
        Provider::OpenAI => Ok(Arc::new(OpenAIClient::from_config(config)?)),
    }
}
