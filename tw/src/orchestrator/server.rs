//! Orchestrator HTTP surface

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::controller::OrchestrationController;
use super::error::OrchestratorError;
use super::gate::{ApprovalDecision, PrefilledGatherer};
use super::state::WorkflowState;
use crate::domain::{TravelPlan, TripRequirements};
use crate::prompts::PromptLoader;
use crate::transport::AgentTransport;

/// Shared state for the planner routes
#[derive(Clone)]
pub struct PlannerState {
    transport: Arc<dyn AgentTransport>,
    prompts: Arc<PromptLoader>,
}

impl PlannerState {
    pub fn new(transport: Arc<dyn AgentTransport>, prompts: Arc<PromptLoader>) -> Self {
        Self { transport, prompts }
    }
}

/// Body of `POST /plan`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Free-text trip request used to pre-fill requirements
    #[serde(default)]
    pub request: String,
    /// Explicit requirements; take precedence over the request text
    #[serde(default)]
    pub requirements: Option<TripRequirements>,
    /// Budget decision; when absent the plan is returned awaiting approval
    #[serde(default)]
    pub approve_budget: Option<bool>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Body returned by `POST /plan`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub session_id: String,
    pub state: WorkflowState,
    pub plan: TravelPlan,
    pub summary: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

impl IntoResponse for OrchestratorError {
    fn into_response(self) -> Response {
        let status = match &self {
            OrchestratorError::Gate(_)
            | OrchestratorError::InvalidRequirements(_)
            | OrchestratorError::RequirementsMissing => StatusCode::BAD_REQUEST,
            OrchestratorError::AgentAlreadyCalled(_)
            | OrchestratorError::InvalidTransition { .. }
            | OrchestratorError::SessionClosed(_) => StatusCode::CONFLICT,
            OrchestratorError::Prompt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self.to_string())
    }
}

/// Drive one session as far as the request allows
pub async fn plan_trip(state: &PlannerState, body: PlanRequest) -> Result<PlanResponse, OrchestratorError> {
    let mut controller = OrchestrationController::with_new_session(state.transport.clone(), state.prompts.clone());
    info!(session_id = %controller.session_id(), "plan_trip: called");

    controller
        .gather(&body.request, &PrefilledGatherer::new(body.requirements))
        .await?;
    while controller.state().pending_agent().is_some() {
        controller.step().await?;
    }
    match body.approve_budget {
        Some(true) => {
            controller.resolve_approval(ApprovalDecision::Approved)?;
        }
        Some(false) => {
            controller.resolve_approval(ApprovalDecision::Rejected {
                reason: body.rejection_reason,
            })?;
        }
        None => {}
    }

    let summary = controller.summary()?;
    let plan = controller.plan().cloned().ok_or(OrchestratorError::RequirementsMissing)?;
    Ok(PlanResponse {
        session_id: controller.session_id().to_string(),
        state: controller.state(),
        plan,
        summary,
    })
}

/// POST /plan
#[instrument(skip(state, body))]
async fn plan_handler(State(state): State<PlannerState>, Json(body): Json<PlanRequest>) -> Response {
    match plan_trip(&state, body).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            warn!(error = %e, "plan_handler: planning failed");
            e.into_response()
        }
    }
}

/// GET /health
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Build the orchestrator Router
pub fn planner_router(state: PlannerState) -> Router {
    Router::new()
        .route("/plan", post(plan_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::domain::{BudgetLevel, BudgetStatus};
    use crate::llm::ScriptedLlmClient;
    use crate::transport::LocalTransport;

    fn state(llm: ScriptedLlmClient) -> PlannerState {
        let prompts = Arc::new(PromptLoader::embedded_only());
        let transport = LocalTransport::from_client(Arc::new(llm), &prompts, &LlmConfig::default()).unwrap();
        PlannerState::new(Arc::new(transport), prompts)
    }

    #[tokio::test]
    async fn test_plan_without_decision_awaits_approval() {
        let state = state(ScriptedLlmClient::texts(["a", "b", "c", "d"]));
        let body = PlanRequest {
            requirements: Some(TripRequirements::new("Oslo", 1, 1, BudgetLevel::Economy).unwrap()),
            ..Default::default()
        };

        let response = plan_trip(&state, body).await.unwrap();
        assert_eq!(response.state, WorkflowState::AwaitingApproval);
        assert_eq!(response.plan.budget_status, BudgetStatus::Pending);
        assert!(response.summary.contains("Itinerary unavailable"));
    }

    #[tokio::test]
    async fn test_plan_with_rejection() {
        let state = state(ScriptedLlmClient::texts(["a", "b", "c", "d"]));
        let body = PlanRequest {
            request: "3 days in Oslo, solo, cheap".to_string(),
            approve_budget: Some(false),
            rejection_reason: Some("no".to_string()),
            ..Default::default()
        };

        let response = plan_trip(&state, body).await.unwrap();
        assert_eq!(response.state, WorkflowState::Rejected);
        assert!(response.plan.finalized);
        assert_eq!(response.plan.requirements.number_of_days, 3);
    }

    #[tokio::test]
    async fn test_incomplete_request_is_bad_request() {
        let state = state(ScriptedLlmClient::texts(Vec::<String>::new()));
        let err = plan_trip(&state, PlanRequest::default()).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
