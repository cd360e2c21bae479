//! Trip requirements gathered before any agent is called

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Spending tier for the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetLevel {
    Economy,
    Comfort,
    Premium,
}

impl BudgetLevel {
    pub const ALL: [BudgetLevel; 3] = [BudgetLevel::Economy, BudgetLevel::Comfort, BudgetLevel::Premium];

    /// Canonical name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Comfort => "Comfort",
            Self::Premium => "Premium",
        }
    }

    /// Map a loose adjective ("cheap", "luxury", ...) onto a tier
    pub fn from_adjective(word: &str) -> Option<Self> {
        debug!(%word, "BudgetLevel::from_adjective: called");
        match word.trim().to_lowercase().as_str() {
            "economy" | "budget" | "cheap" | "affordable" | "backpacking" | "backpacker" | "low-cost"
            | "inexpensive" => Some(Self::Economy),
            "comfort" | "mid-range" | "midrange" | "moderate" | "comfortable" | "standard" => Some(Self::Comfort),
            "premium" | "luxury" | "luxurious" | "upscale" | "high-end" | "deluxe" | "lavish" => Some(Self::Premium),
            _ => None,
        }
    }
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetLevel {
    type Err = RequirementsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_adjective(s).ok_or_else(|| RequirementsError::UnknownBudgetLevel(s.to_string()))
    }
}

/// Reasons a requirements set is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementsError {
    #[error("city must not be empty")]
    EmptyCity,

    #[error("numberOfDays must be at least 1")]
    NoDays,

    #[error("numberOfPeople must be at least 1")]
    NoPeople,

    #[error("unknown budget level '{0}', expected Economy, Comfort or Premium")]
    UnknownBudgetLevel(String),

    #[error("missing {0}")]
    Missing(&'static str),
}

/// Validated trip parameters; immutable once confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequirements {
    pub city: String,
    pub number_of_days: u32,
    pub number_of_people: u32,
    pub budget_level: BudgetLevel,
}

impl TripRequirements {
    /// Build and validate a requirements set
    pub fn new(
        city: impl Into<String>,
        number_of_days: u32,
        number_of_people: u32,
        budget_level: BudgetLevel,
    ) -> Result<Self, RequirementsError> {
        let requirements = Self {
            city: city.into().trim().to_string(),
            number_of_days,
            number_of_people,
            budget_level,
        };
        requirements.validate()?;
        Ok(requirements)
    }

    /// Check the invariants a deserialized value may have skipped
    pub fn validate(&self) -> Result<(), RequirementsError> {
        if self.city.trim().is_empty() {
            return Err(RequirementsError::EmptyCity);
        }
        if self.number_of_days < 1 {
            return Err(RequirementsError::NoDays);
        }
        if self.number_of_people < 1 {
            return Err(RequirementsError::NoPeople);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates() {
        assert!(TripRequirements::new("Tokyo", 3, 2, BudgetLevel::Comfort).is_ok());
        assert_eq!(
            TripRequirements::new("  ", 3, 2, BudgetLevel::Comfort),
            Err(RequirementsError::EmptyCity)
        );
        assert_eq!(
            TripRequirements::new("Tokyo", 0, 2, BudgetLevel::Comfort),
            Err(RequirementsError::NoDays)
        );
        assert_eq!(
            TripRequirements::new("Tokyo", 3, 0, BudgetLevel::Comfort),
            Err(RequirementsError::NoPeople)
        );
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"city":"Tokyo","numberOfDays":3,"numberOfPeople":2,"budgetLevel":"Comfort"}"#;
        let req: TripRequirements = serde_json::from_str(json).unwrap();
        assert_eq!(req, TripRequirements::new("Tokyo", 3, 2, BudgetLevel::Comfort).unwrap());
        assert_eq!(serde_json::to_string(&req).unwrap(), json);
    }

    #[test]
    fn test_budget_level_adjectives() {
        assert_eq!(BudgetLevel::from_adjective("cheap"), Some(BudgetLevel::Economy));
        assert_eq!(BudgetLevel::from_adjective("Budget"), Some(BudgetLevel::Economy));
        assert_eq!(BudgetLevel::from_adjective("mid-range"), Some(BudgetLevel::Comfort));
        assert_eq!(BudgetLevel::from_adjective("LUXURY"), Some(BudgetLevel::Premium));
        assert_eq!(BudgetLevel::from_adjective("fancy-ish"), None);
        assert!("premium".parse::<BudgetLevel>().is_ok());
        assert!("gold".parse::<BudgetLevel>().is_err());
    }
}
