//! TravelPlan - the orchestrator's accumulated cross-agent result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::budget::BudgetDoc;
use super::itinerary::{DayItinerary, ItineraryDoc};
use super::restaurant::{DayMeals, RestaurantDoc};
use super::trip::TripRequirements;
use super::weather::WeatherDoc;

/// Outcome of one workflow step as recorded in the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum PlanSlot<T> {
    Ready(T),
    Failed { error: String },
}

impl<T> PlanSlot<T> {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed { error: error.into() }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// Approval status of the proposed budget
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BudgetStatus {
    /// No budget proposed yet, or proposed and awaiting a decision
    #[default]
    Pending,
    Approved,
    Rejected { reason: Option<String> },
}

/// Accumulated travel plan for one orchestrator session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    pub requirements: TripRequirements,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<PlanSlot<Vec<DayItinerary>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<PlanSlot<WeatherDoc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meals: Option<PlanSlot<Vec<DayMeals>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<PlanSlot<BudgetDoc>>,
    pub budget_status: BudgetStatus,
    pub created_at: DateTime<Utc>,
    pub finalized: bool,
}

impl TravelPlan {
    /// Empty plan for a confirmed set of requirements
    pub fn new(requirements: TripRequirements) -> Self {
        debug!(city = %requirements.city, "TravelPlan::new: called");
        Self {
            requirements,
            itinerary: None,
            weather: None,
            meals: None,
            budget: None,
            budget_status: BudgetStatus::Pending,
            created_at: Utc::now(),
            finalized: false,
        }
    }

    /// Store the itinerary with meals cleared; restaurant results fill them later
    pub fn set_itinerary(&mut self, doc: ItineraryDoc) {
        debug!(days = doc.itinerary.len(), "TravelPlan::set_itinerary: called");
        let days = doc
            .itinerary
            .into_iter()
            .map(|mut day| {
                day.meals = Default::default();
                day
            })
            .collect();
        self.itinerary = Some(PlanSlot::Ready(days));
    }

    pub fn set_itinerary_failed(&mut self, error: impl Into<String>) {
        self.itinerary = Some(PlanSlot::failed(error));
    }

    pub fn set_weather(&mut self, slot: PlanSlot<WeatherDoc>) {
        self.weather = Some(slot);
    }

    pub fn set_meals_failed(&mut self, error: impl Into<String>) {
        self.meals = Some(PlanSlot::failed(error));
    }

    /// Fold restaurant meals into the itinerary by day number
    ///
    /// Days present in both get the restaurant's meals. Days only in the
    /// restaurant result are appended as placeholder days. Itinerary days
    /// with no matching restaurant day keep empty meals. When the itinerary
    /// itself failed the meals are still kept on the plan.
    pub fn merge_meals(&mut self, doc: RestaurantDoc) {
        debug!(days = doc.meals.len(), "TravelPlan::merge_meals: called");
        if let Some(PlanSlot::Ready(days)) = self.itinerary.as_mut() {
            for day_meals in &doc.meals {
                match days.iter_mut().find(|d| d.day == day_meals.day) {
                    Some(day) => day.meals = day_meals.to_meals(),
                    None => {
                        debug!(day = day_meals.day, "merge_meals: appending day missing from itinerary");
                        let mut day = DayItinerary::placeholder(day_meals.day);
                        day.meals = day_meals.to_meals();
                        days.push(day);
                    }
                }
            }
        } else {
            debug!("merge_meals: no itinerary to merge into");
        }
        self.meals = Some(PlanSlot::Ready(doc.meals));
    }

    pub fn set_budget(&mut self, slot: PlanSlot<BudgetDoc>) {
        self.budget = Some(slot);
        self.budget_status = BudgetStatus::Pending;
    }

    /// The proposed budget, if the budget agent succeeded
    pub fn proposed_budget(&self) -> Option<&BudgetDoc> {
        self.budget.as_ref().and_then(PlanSlot::ready)
    }

    /// Itinerary days, if the itinerary agent succeeded
    pub fn days(&self) -> Option<&[DayItinerary]> {
        self.itinerary.as_ref().and_then(PlanSlot::ready).map(Vec::as_slice)
    }

    /// Mark read-only; called once the workflow reaches a terminal state
    pub fn finalize(&mut self) {
        self.finalized = true;
    }
}
