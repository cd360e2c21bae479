//! OrchestrationController - drives one planning session through the agents
//!
//! The controller owns the session's [`TravelPlan`] and [`WorkflowState`].
//! Agent calls happen one at a time through `&mut self`, in workflow order,
//! and each agent is called at most once per session. A failed agent is
//! recorded in its plan slot and the workflow moves on.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::OrchestratorError;
use super::gate::{ApprovalDecision, BudgetApprover, RequirementsGatherer};
use super::hints::extract_hints;
use super::state::WorkflowState;
use crate::domain::{
    AgentKind, AgentOutcome, BudgetStatus, ErrorPayload, PlanSlot, StructuredDocument, TravelPlan, TripRequirements,
};
use crate::prompts::PromptLoader;
use crate::structured;
use crate::transport::AgentTransport;

/// What one step did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub agent: AgentKind,
    /// Why the agent's slot holds a failure, if it does
    pub error: Option<String>,
}

/// Orchestrates one travel-planning session
pub struct OrchestrationController {
    session_id: String,
    transport: Arc<dyn AgentTransport>,
    prompts: Arc<PromptLoader>,
    state: WorkflowState,
    plan: Option<TravelPlan>,
    calls: Vec<AgentKind>,
}

impl OrchestrationController {
    pub fn new(transport: Arc<dyn AgentTransport>, prompts: Arc<PromptLoader>, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        debug!(%session_id, "OrchestrationController::new: called");
        Self {
            session_id,
            transport,
            prompts,
            state: WorkflowState::AwaitingRequirements,
            plan: None,
            calls: Vec::new(),
        }
    }

    /// Controller with a fresh session id
    pub fn with_new_session(transport: Arc<dyn AgentTransport>, prompts: Arc<PromptLoader>) -> Self {
        Self::new(transport, prompts, uuid::Uuid::now_v7().to_string())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn plan(&self) -> Option<&TravelPlan> {
        self.plan.as_ref()
    }

    /// Agents called so far, in call order
    pub fn calls(&self) -> &[AgentKind] {
        &self.calls
    }

    fn guard_open(&self) -> Result<(), OrchestratorError> {
        if self.state.is_terminal() {
            return Err(OrchestratorError::SessionClosed(self.state));
        }
        Ok(())
    }

    /// Accept confirmed requirements and start the agent sequence
    pub fn confirm(&mut self, requirements: TripRequirements) -> Result<(), OrchestratorError> {
        debug!(city = %requirements.city, state = %self.state, "confirm: called");
        self.guard_open()?;
        if self.state != WorkflowState::AwaitingRequirements {
            return Err(OrchestratorError::InvalidTransition {
                state: self.state,
                action: "confirm requirements",
            });
        }
        requirements.validate()?;
        info!(
            session_id = %self.session_id,
            city = %requirements.city,
            days = requirements.number_of_days,
            people = requirements.number_of_people,
            level = %requirements.budget_level,
            "confirm: requirements confirmed"
        );
        self.plan = Some(TravelPlan::new(requirements));
        self.state = WorkflowState::ItineraryPending;
        Ok(())
    }

    /// Pre-fill from the request text and block on the gatherer
    pub async fn gather(
        &mut self,
        request: &str,
        gatherer: &dyn RequirementsGatherer,
    ) -> Result<&TripRequirements, OrchestratorError> {
        debug!(state = %self.state, "gather: called");
        self.guard_open()?;
        if self.state != WorkflowState::AwaitingRequirements {
            return Err(OrchestratorError::InvalidTransition {
                state: self.state,
                action: "gather requirements",
            });
        }
        let hints = extract_hints(request);
        let requirements = gatherer.gather(&hints).await?;
        self.confirm(requirements)?;
        self.plan
            .as_ref()
            .map(|plan| &plan.requirements)
            .ok_or(OrchestratorError::RequirementsMissing)
    }

    /// Make the single agent call the current state is waiting on
    pub async fn step(&mut self) -> Result<StepReport, OrchestratorError> {
        debug!(state = %self.state, "step: called");
        self.guard_open()?;
        let Some(kind) = self.state.pending_agent() else {
            return Err(match self.state {
                WorkflowState::AwaitingRequirements => OrchestratorError::RequirementsMissing,
                state => OrchestratorError::InvalidTransition {
                    state,
                    action: "call an agent",
                },
            });
        };
        if self.calls.contains(&kind) {
            return Err(OrchestratorError::AgentAlreadyCalled(kind));
        }
        let Some(plan) = self.plan.as_ref() else {
            return Err(OrchestratorError::RequirementsMissing);
        };

        let query = self.prompts.delegation(kind, &plan.requirements)?;
        // Logged before the call so a failed call still counts as made
        self.calls.push(kind);
        info!(session_id = %self.session_id, %kind, "step: calling agent");
        let outcome = match self.transport.call(kind, &query, &self.session_id).await {
            Ok(text) => structured::read_reply(&text, kind),
            Err(e) => {
                warn!(%kind, error = %e, "step: agent call failed");
                AgentOutcome::Failed(ErrorPayload {
                    error: e.to_string(),
                    raw_content: None,
                })
            }
        };

        let error = match &outcome {
            AgentOutcome::Document(_) => None,
            AgentOutcome::Failed(payload) => Some(payload.error.clone()),
        };
        let plan = self.plan.as_mut().ok_or(OrchestratorError::RequirementsMissing)?;
        fold(plan, kind, outcome);

        if let Some(next) = self.state.after_call() {
            self.state = next;
        }
        debug!(%kind, state = %self.state, ok = error.is_none(), "step: advanced");
        Ok(StepReport { agent: kind, error })
    }

    /// Apply the external accept/reject signal for the proposed budget
    pub fn resolve_approval(&mut self, decision: ApprovalDecision) -> Result<WorkflowState, OrchestratorError> {
        debug!(?decision, state = %self.state, "resolve_approval: called");
        self.guard_open()?;
        if self.state != WorkflowState::AwaitingApproval {
            return Err(OrchestratorError::InvalidTransition {
                state: self.state,
                action: "resolve budget approval",
            });
        }
        let plan = self.plan.as_mut().ok_or(OrchestratorError::RequirementsMissing)?;
        self.state = match decision {
            ApprovalDecision::Approved => {
                plan.budget_status = BudgetStatus::Approved;
                WorkflowState::Complete
            }
            ApprovalDecision::Rejected { reason } => {
                plan.budget_status = BudgetStatus::Rejected { reason };
                WorkflowState::Rejected
            }
        };
        plan.finalize();
        info!(session_id = %self.session_id, state = %self.state, "resolve_approval: session closed");
        Ok(self.state)
    }

    /// Human-readable rendering of everything gathered so far
    pub fn summary(&self) -> Result<String, OrchestratorError> {
        let plan = self.plan.as_ref().ok_or(OrchestratorError::RequirementsMissing)?;
        Ok(self.prompts.summary(plan)?)
    }

    /// Run from the current state to a terminal state
    pub async fn run(
        &mut self,
        request: &str,
        gatherer: &dyn RequirementsGatherer,
        approver: &dyn BudgetApprover,
    ) -> Result<&TravelPlan, OrchestratorError> {
        debug!(session_id = %self.session_id, state = %self.state, "run: called");
        self.guard_open()?;
        if self.state == WorkflowState::AwaitingRequirements {
            self.gather(request, gatherer).await?;
        }
        while self.state.pending_agent().is_some() {
            self.step().await?;
        }
        if self.state == WorkflowState::AwaitingApproval {
            let summary = self.summary()?;
            let plan = self.plan.as_ref().ok_or(OrchestratorError::RequirementsMissing)?;
            let decision = approver.decide(plan, &summary).await?;
            self.resolve_approval(decision)?;
        }
        self.plan.as_ref().ok_or(OrchestratorError::RequirementsMissing)
    }
}

/// Fold one agent outcome into the plan
fn fold(plan: &mut TravelPlan, kind: AgentKind, outcome: AgentOutcome) {
    match outcome {
        AgentOutcome::Document(StructuredDocument::Itinerary(doc)) => plan.set_itinerary(doc),
        AgentOutcome::Document(StructuredDocument::Weather(doc)) => plan.set_weather(PlanSlot::Ready(doc)),
        AgentOutcome::Document(StructuredDocument::Restaurant(doc)) => plan.merge_meals(doc),
        AgentOutcome::Document(StructuredDocument::Budget(doc)) => plan.set_budget(PlanSlot::Ready(doc)),
        AgentOutcome::Failed(payload) => match kind {
            AgentKind::Itinerary => plan.set_itinerary_failed(payload.error),
            AgentKind::Weather => plan.set_weather(PlanSlot::failed(payload.error)),
            AgentKind::Restaurant => plan.set_meals_failed(payload.error),
            AgentKind::Budget => plan.set_budget(PlanSlot::failed(payload.error)),
        },
    }
}
