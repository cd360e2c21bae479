//! Workflow states of one orchestrator session

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::AgentKind;

/// Where a planning session is in its workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowState {
    /// Waiting for a confirmed set of trip requirements
    #[default]
    AwaitingRequirements,
    ItineraryPending,
    WeatherPending,
    RestaurantPending,
    BudgetPending,
    /// Budget proposed, waiting for an accept/reject signal
    AwaitingApproval,
    Complete,
    /// Budget rejected; the session is closed
    Rejected,
}

impl WorkflowState {
    /// The agent whose call this state is waiting on
    pub fn pending_agent(&self) -> Option<AgentKind> {
        match self {
            Self::ItineraryPending => Some(AgentKind::Itinerary),
            Self::WeatherPending => Some(AgentKind::Weather),
            Self::RestaurantPending => Some(AgentKind::Restaurant),
            Self::BudgetPending => Some(AgentKind::Budget),
            _ => None,
        }
    }

    /// State that follows a completed call in this state
    pub fn after_call(&self) -> Option<Self> {
        match self {
            Self::ItineraryPending => Some(Self::WeatherPending),
            Self::WeatherPending => Some(Self::RestaurantPending),
            Self::RestaurantPending => Some(Self::BudgetPending),
            Self::BudgetPending => Some(Self::AwaitingApproval),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Rejected)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitingRequirements => "awaiting-requirements",
            Self::ItineraryPending => "itinerary-pending",
            Self::WeatherPending => "weather-pending",
            Self::RestaurantPending => "restaurant-pending",
            Self::BudgetPending => "budget-pending",
            Self::AwaitingApproval => "awaiting-approval",
            Self::Complete => "complete",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
