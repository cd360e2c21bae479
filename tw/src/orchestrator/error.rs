//! Orchestrator error types

use thiserror::Error;

use super::state::WorkflowState;
use crate::domain::{AgentKind, RequirementsError};
use crate::prompts::PromptError;

/// Failures of the human-in-the-loop gates
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Invalid(#[from] RequirementsError),

    #[error("Console error: {0}")]
    Console(String),
}

/// Workflow violations and gate failures
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Trip requirements have not been confirmed")]
    RequirementsMissing,

    #[error("Invalid trip requirements: {0}")]
    InvalidRequirements(#[from] RequirementsError),

    #[error("Agent {0} was already called in this session")]
    AgentAlreadyCalled(AgentKind),

    #[error("Cannot {action} while {state}")]
    InvalidTransition { state: WorkflowState, action: &'static str },

    #[error("Session is closed ({0})")]
    SessionClosed(WorkflowState),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}
