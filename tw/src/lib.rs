//! Tripweave - Sequential Multi-Agent Travel Planner
//!
//! An orchestrator delegates a trip to four specialized agents (itinerary,
//! weather, restaurant, budget) one at a time. Each agent wraps a single
//! model call and turns the free-text reply into a validated document or a
//! typed error payload.
//!
//! # Core Concepts
//!
//! - **One Generic Agent**: the four agents differ only in prompt and schema
//! - **Documents or Errors**: decoding never panics and never leaks raw failures
//! - **Strictly Sequential**: one in-flight call per session, each agent at most once
//! - **Partial Plans Survive**: a failed agent is recorded and the workflow moves on
//!
//! # Modules
//!
//! - [`domain`] - Trip requirements, agent documents and the travel plan
//! - [`structured`] - Fence extraction, JSON decoding and validation
//! - [`session`] - Per-agent conversation sessions
//! - [`llm`] - Model client trait with Gemini and OpenAI implementations
//! - [`agent`] - Generic agent endpoint, executor and discovery card
//! - [`a2a`] - A2A JSON-RPC wire types and agent server
//! - [`transport`] - In-process and HTTP paths from orchestrator to agents
//! - [`orchestrator`] - Workflow state machine, gates and the `/plan` surface
//! - [`prompts`] - Prompt templates with override chain
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod a2a;
pub mod agent;
pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod orchestrator;
pub mod prompts;
pub mod session;
pub mod structured;
pub mod transport;

// Re-export commonly used types
pub use agent::{AgentCard, AgentEndpoint, AgentExecutor};
pub use config::Config;
pub use domain::{AgentKind, AgentOutcome, ErrorPayload, StructuredDocument, TravelPlan, TripRequirements};
pub use orchestrator::{OrchestrationController, WorkflowState};
pub use session::SessionStore;
