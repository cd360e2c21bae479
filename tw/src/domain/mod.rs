//! Domain types for trip planning
//!
//! Requirements, the four agent documents, and the accumulated plan.

mod budget;
mod document;
mod itinerary;
mod plan;
mod restaurant;
mod trip;
mod weather;

pub use budget::{BudgetCategory, BudgetDoc};
pub use document::{AgentKind, AgentOutcome, ErrorPayload, RAW_CONTENT_LIMIT, StructuredDocument};
pub use itinerary::{DayItinerary, ItineraryDoc, Meals, TimeSlot};
pub use plan::{BudgetStatus, PlanSlot, TravelPlan};
pub use restaurant::{DayMeals, RestaurantDoc};
pub use trip::{BudgetLevel, RequirementsError, TripRequirements};
pub use weather::{DailyWeather, WeatherDoc};

/// Cross-field rules a document must satisfy beyond its serde shape
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
