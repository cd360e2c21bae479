//! Agent discovery document

use serde::{Deserialize, Serialize};

use super::spec::{AgentSkill, AgentSpec};

/// Version advertised by every agent card
pub const CARD_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    pub streaming: bool,
}

/// Discovery document served at `/.well-known/agent-card.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub capabilities: AgentCapabilities,
    pub skills: Vec<AgentSkill>,
    pub supports_authenticated_extended_card: bool,
}

impl AgentCard {
    /// Card for an agent reachable at `url`
    pub fn new(spec: &AgentSpec, url: impl Into<String>) -> Self {
        Self {
            name: spec.display_name.clone(),
            description: spec.description.clone(),
            url: url.into(),
            version: CARD_VERSION.to_string(),
            default_input_modes: vec!["text".to_string()],
            default_output_modes: vec!["text".to_string()],
            capabilities: AgentCapabilities { streaming: true },
            skills: vec![spec.skill.clone()],
            supports_authenticated_extended_card: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AgentKind;

    #[test]
    fn test_card_wire_shape() {
        let card = AgentCard::new(&AgentSpec::builtin(AgentKind::Budget), "http://localhost:9002/");
        let value = serde_json::to_value(&card).unwrap();

        assert_eq!(value["name"], "Budget Agent");
        assert_eq!(value["url"], "http://localhost:9002/");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["defaultInputModes"], serde_json::json!(["text"]));
        assert_eq!(value["defaultOutputModes"], serde_json::json!(["text"]));
        assert_eq!(value["capabilities"]["streaming"], true);
        assert_eq!(value["skills"][0]["id"], "budget_agent");
        assert_eq!(value["supportsAuthenticatedExtendedCard"], false);
    }
}
