//! Agent kinds, structured documents and error payloads
//!
//! Every agent reply is either a validated [`StructuredDocument`] or an
//! [`ErrorPayload`]; [`AgentOutcome`] carries one of the two across the
//! transport boundary as pretty-printed JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::budget::BudgetDoc;
use super::itinerary::ItineraryDoc;
use super::restaurant::RestaurantDoc;
use super::weather::WeatherDoc;

/// Maximum number of characters of offending text kept in a parse failure
pub const RAW_CONTENT_LIMIT: usize = 200;

/// The four specialized agents, in workflow order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Itinerary,
    Weather,
    Restaurant,
    Budget,
}

impl AgentKind {
    /// All agents in the order the orchestrator calls them
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Itinerary,
        AgentKind::Weather,
        AgentKind::Restaurant,
        AgentKind::Budget,
    ];

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Itinerary => "itinerary",
            Self::Weather => "weather",
            Self::Restaurant => "restaurant",
            Self::Budget => "budget",
        }
    }

    /// Agent identifier used for sessions and skills
    pub fn agent_id(&self) -> &'static str {
        match self {
            Self::Itinerary => "itinerary_agent",
            Self::Weather => "weather_agent",
            Self::Restaurant => "restaurant_agent",
            Self::Budget => "budget_agent",
        }
    }

    /// What the agent failed to produce, as used in parse-failure messages
    pub fn error_subject(&self) -> &'static str {
        match self {
            Self::Itinerary => "itinerary",
            Self::Weather => "weather forecast",
            Self::Restaurant => "restaurant recommendations",
            Self::Budget => "budget",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::Itinerary => 9001,
            Self::Budget => 9002,
            Self::Restaurant => 9003,
            Self::Weather => 9005,
        }
    }

    /// Environment variable overriding the listening port
    pub fn port_env(&self) -> &'static str {
        match self {
            Self::Itinerary => "ITINERARY_PORT",
            Self::Weather => "WEATHER_PORT",
            Self::Restaurant => "RESTAURANT_PORT",
            Self::Budget => "BUDGET_PORT",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().trim_end_matches("_agent") {
            "itinerary" => Ok(Self::Itinerary),
            "weather" => Ok(Self::Weather),
            "restaurant" | "restaurants" => Ok(Self::Restaurant),
            "budget" => Ok(Self::Budget),
            other => Err(format!(
                "Unknown agent: {}. Use: itinerary, weather, restaurant, or budget",
                other
            )),
        }
    }
}

/// A validated agent result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredDocument {
    Itinerary(ItineraryDoc),
    Weather(WeatherDoc),
    Restaurant(RestaurantDoc),
    Budget(BudgetDoc),
}

impl StructuredDocument {
    pub fn kind(&self) -> AgentKind {
        match self {
            Self::Itinerary(_) => AgentKind::Itinerary,
            Self::Weather(_) => AgentKind::Weather,
            Self::Restaurant(_) => AgentKind::Restaurant,
            Self::Budget(_) => AgentKind::Budget,
        }
    }
}

/// Typed failure returned in place of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

impl ErrorPayload {
    /// The extracted text was not JSON
    pub fn parse_failure(kind: AgentKind, extracted: &str) -> Self {
        Self {
            error: format!("Failed to generate structured {}", kind.error_subject()),
            raw_content: Some(extracted.chars().take(RAW_CONTENT_LIMIT).collect()),
        }
    }

    /// The JSON did not match the schema
    pub fn validation_failure(reason: impl fmt::Display) -> Self {
        Self {
            error: format!("Validation failed: {}", reason),
            raw_content: None,
        }
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

/// Result of one agent invocation
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    Document(StructuredDocument),
    Failed(ErrorPayload),
}

impl AgentOutcome {
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }

    /// Pretty-printed JSON as sent over the wire
    pub fn to_wire_json(&self) -> String {
        let encoded = match self {
            Self::Document(doc) => serde_json::to_string_pretty(doc),
            Self::Failed(payload) => serde_json::to_string_pretty(payload),
        };
        // Both sides are plain data with string keys
        encoded.unwrap_or_else(|e| format!("{{\"error\": \"Failed to encode reply: {}\"}}", e))
    }
}

impl From<Result<StructuredDocument, ErrorPayload>> for AgentOutcome {
    fn from(result: Result<StructuredDocument, ErrorPayload>) -> Self {
        match result {
            Ok(doc) => Self::Document(doc),
            Err(payload) => Self::Failed(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_kind_parse() {
        assert_eq!("itinerary".parse::<AgentKind>(), Ok(AgentKind::Itinerary));
        assert_eq!("Weather".parse::<AgentKind>(), Ok(AgentKind::Weather));
        assert_eq!("restaurant_agent".parse::<AgentKind>(), Ok(AgentKind::Restaurant));
        assert_eq!("budget".parse::<AgentKind>(), Ok(AgentKind::Budget));
        assert!("flights".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(AgentKind::Itinerary.default_port(), 9001);
        assert_eq!(AgentKind::Budget.default_port(), 9002);
        assert_eq!(AgentKind::Restaurant.default_port(), 9003);
        assert_eq!(AgentKind::Weather.default_port(), 9005);
    }

    #[test]
    fn test_parse_failure_truncates_by_chars() {
        let text = "é".repeat(250);
        let payload = ErrorPayload::parse_failure(AgentKind::Weather, &text);
        assert_eq!(payload.error, "Failed to generate structured weather forecast");
        assert_eq!(payload.raw_content.as_deref().map(|s| s.chars().count()), Some(200));
    }

    #[test]
    fn test_error_payload_wire_format() {
        let failed = AgentOutcome::Failed(ErrorPayload::validation_failure("missing field `days`"));
        assert_eq!(
            failed.to_wire_json(),
            "{\n  \"error\": \"Validation failed: missing field `days`\"\n}"
        );

        let parse = AgentOutcome::Failed(ErrorPayload::parse_failure(AgentKind::Budget, "oops"));
        let value: serde_json::Value = serde_json::from_str(&parse.to_wire_json()).unwrap();
        assert_eq!(value["error"], "Failed to generate structured budget");
        assert_eq!(value["raw_content"], "oops");
    }
}
