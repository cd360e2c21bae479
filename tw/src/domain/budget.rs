//! Budget agent document

use serde::{Deserialize, Serialize};

use super::Validate;
use crate::structured::lenient;

fn default_currency() -> String {
    "USD".to_string()
}

/// One line of the cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub category: String,
    #[serde(deserialize_with = "lenient::float")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient::float")]
    pub percentage: f64,
}

/// Validated cost estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDoc {
    #[serde(deserialize_with = "lenient::float")]
    pub total_budget: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub breakdown: Vec<BudgetCategory>,
    pub notes: String,
}

impl Validate for BudgetDoc {
    fn validate(&self) -> Result<(), String> {
        if self.total_budget < 0.0 {
            return Err(format!("totalBudget must not be negative, got {}", self.total_budget));
        }
        Ok(())
    }
}
