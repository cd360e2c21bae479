//! Orchestration of the four agents for one planning session
//!
//! - `hints`: pre-fill trip requirements from free text
//! - `gate`: human-in-the-loop requirements and budget approval
//! - `controller`: the sequential, single-flight workflow
//! - `server`: the `/plan` HTTP surface

mod controller;
mod error;
mod gate;
mod hints;
mod server;
mod state;

pub use controller::{OrchestrationController, StepReport};
pub use error::{GateError, OrchestratorError};
pub use gate::{
    ApprovalDecision, BudgetApprover, ConsoleApprover, ConsoleGatherer, FixedApprover, PrefilledGatherer,
    RequirementsGatherer,
};
pub use hints::{TripHints, extract_hints};
pub use server::{PlanRequest, PlanResponse, PlannerState, plan_trip, planner_router};
pub use state::WorkflowState;
