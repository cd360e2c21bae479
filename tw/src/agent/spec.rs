//! Per-agent configuration data
//!
//! Everything that distinguishes the four agents lives here: instruction
//! text, discovery metadata and (via [`AgentKind`]) schema and port.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::AgentKind;
use crate::prompts::{PromptError, PromptLoader, embedded};

/// Capability advertised in an agent card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub examples: Vec<String>,
}

/// Static description of one agent
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub kind: AgentKind,
    pub display_name: String,
    pub description: String,
    pub instruction: String,
    pub skill: AgentSkill,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl AgentSpec {
    /// Spec with the instruction resolved through the prompt override chain
    pub fn load(kind: AgentKind, prompts: &PromptLoader) -> Result<Self, PromptError> {
        debug!(%kind, "AgentSpec::load: called");
        let instruction = prompts.instruction(kind)?;
        Ok(Self::with_instruction(kind, instruction))
    }

    /// Spec with the compiled-in instruction
    pub fn builtin(kind: AgentKind) -> Self {
        let instruction = embedded::get_embedded(&embedded::instruction_name(kind)).unwrap_or_default();
        Self::with_instruction(kind, instruction.to_string())
    }

    fn with_instruction(kind: AgentKind, instruction: String) -> Self {
        let (display_name, description, skill_name, skill_description, tags, examples) = match kind {
            AgentKind::Itinerary => (
                "Itinerary Agent",
                "Creates detailed day-by-day travel itineraries with morning, afternoon and evening activities",
                "Itinerary Planning Agent",
                "Creates detailed day-by-day travel itineraries",
                &["travel", "itinerary", "planning"][..],
                &[
                    "Create a 3-day itinerary for Tokyo",
                    "Plan a week-long trip to Paris",
                    "What should I do in New York for 5 days?",
                ][..],
            ),
            AgentKind::Weather => (
                "Weather Agent",
                "Provides weather forecasts and packing advice for travelers",
                "Weather Forecast Agent",
                "Provides weather forecasts and travel weather advice",
                &["travel", "weather", "forecast", "climate"][..],
                &[
                    "What will the weather be like in Tokyo next week?",
                    "Should I pack an umbrella for my Paris trip?",
                    "Give me the weather forecast for my 5-day New York visit",
                ][..],
            ),
            AgentKind::Restaurant => (
                "Restaurant Agent",
                "Provides personalized restaurant and dining recommendations for travelers",
                "Restaurant Recommendation Agent",
                "Provides day-by-day breakfast, lunch and dinner recommendations",
                &["travel", "restaurants", "dining", "food"][..],
                &[
                    "Recommend restaurants for my trip to Tokyo",
                    "Where should I eat in Paris?",
                    "Find good restaurants near my itinerary locations",
                ][..],
            ),
            AgentKind::Budget => (
                "Budget Agent",
                "Estimates travel budgets and creates cost breakdowns",
                "Budget Planning Agent",
                "Estimates travel costs and creates detailed budget breakdowns",
                &["travel", "budget", "finance"][..],
                &[
                    "Estimate the budget for a 3-day trip to Tokyo",
                    "How much would a week in Paris cost?",
                    "Create a budget for my New York trip",
                ][..],
            ),
        };

        Self {
            kind,
            display_name: display_name.to_string(),
            description: description.to_string(),
            instruction,
            skill: AgentSkill {
                id: kind.agent_id().to_string(),
                name: skill_name.to_string(),
                description: skill_description.to_string(),
                tags: strings(tags),
                examples: strings(examples),
            },
        }
    }
}
