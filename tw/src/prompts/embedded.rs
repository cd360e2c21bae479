//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

use crate::domain::AgentKind;

pub const AGENT_ITINERARY: &str = include_str!("../../prompts/agent-itinerary.pmt");
pub const AGENT_WEATHER: &str = include_str!("../../prompts/agent-weather.pmt");
pub const AGENT_RESTAURANT: &str = include_str!("../../prompts/agent-restaurant.pmt");
pub const AGENT_BUDGET: &str = include_str!("../../prompts/agent-budget.pmt");

pub const ASK_ITINERARY: &str = include_str!("../../prompts/ask-itinerary.pmt");
pub const ASK_WEATHER: &str = include_str!("../../prompts/ask-weather.pmt");
pub const ASK_RESTAURANT: &str = include_str!("../../prompts/ask-restaurant.pmt");
pub const ASK_BUDGET: &str = include_str!("../../prompts/ask-budget.pmt");

/// Combined plan rendering
pub const PLAN_SUMMARY: &str = include_str!("../../prompts/plan-summary.pmt");

/// Template name of an agent's instruction
pub fn instruction_name(kind: AgentKind) -> String {
    format!("agent-{}", kind.name())
}

/// Template name of the orchestrator's query to an agent
pub fn delegation_name(kind: AgentKind) -> String {
    format!("ask-{}", kind.name())
}

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "agent-itinerary" => Some(AGENT_ITINERARY),
        "agent-weather" => Some(AGENT_WEATHER),
        "agent-restaurant" => Some(AGENT_RESTAURANT),
        "agent-budget" => Some(AGENT_BUDGET),
        "ask-itinerary" => Some(ASK_ITINERARY),
        "ask-weather" => Some(ASK_WEATHER),
        "ask-restaurant" => Some(ASK_RESTAURANT),
        "ask-budget" => Some(ASK_BUDGET),
        "plan-summary" => Some(PLAN_SUMMARY),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_agent_has_instruction_and_query() {
        for kind in AgentKind::ALL {
            let instruction = get_embedded(&instruction_name(kind)).unwrap();
            assert!(instruction.contains("Return ONLY valid JSON"));
            assert!(get_embedded(&delegation_name(kind)).unwrap().contains("{{city}}"));
        }
    }

    #[test]
    fn test_instructions_name_schema_fields() {
        assert!(AGENT_WEATHER.contains("\"bestDays\""));
        assert!(AGENT_RESTAURANT.contains("MUST match the \"days\" field"));
        assert!(AGENT_BUDGET.contains("\"totalBudget\""));
        assert!(AGENT_ITINERARY.contains("\"itinerary\""));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
