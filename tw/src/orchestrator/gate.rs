//! Human-in-the-loop gates: requirements confirmation and budget approval

use async_trait::async_trait;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::GateError;
use super::hints::TripHints;
use crate::domain::{BudgetLevel, TravelPlan, TripRequirements};

/// Accept/reject signal for a proposed budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum ApprovalDecision {
    Approved,
    Rejected { reason: Option<String> },
}

/// Turns pre-filled hints into confirmed requirements
#[async_trait]
pub trait RequirementsGatherer: Send + Sync {
    async fn gather(&self, hints: &TripHints) -> Result<TripRequirements, GateError>;
}

/// Decides on the proposed budget
#[async_trait]
pub trait BudgetApprover: Send + Sync {
    async fn decide(&self, plan: &TravelPlan, summary: &str) -> Result<ApprovalDecision, GateError>;
}

/// Non-interactive gatherer
///
/// Uses the given requirements when present, otherwise the hints must be
/// complete on their own.
#[derive(Debug, Clone, Default)]
pub struct PrefilledGatherer {
    requirements: Option<TripRequirements>,
}

impl PrefilledGatherer {
    pub fn new(requirements: Option<TripRequirements>) -> Self {
        Self { requirements }
    }
}

#[async_trait]
impl RequirementsGatherer for PrefilledGatherer {
    async fn gather(&self, hints: &TripHints) -> Result<TripRequirements, GateError> {
        debug!(?hints, explicit = self.requirements.is_some(), "PrefilledGatherer::gather: called");
        match &self.requirements {
            Some(requirements) => {
                requirements.validate()?;
                Ok(requirements.clone())
            }
            None => Ok(hints.to_requirements()?),
        }
    }
}

/// Always returns the same decision
#[derive(Debug, Clone)]
pub struct FixedApprover(pub ApprovalDecision);

impl FixedApprover {
    pub fn approve() -> Self {
        Self(ApprovalDecision::Approved)
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self(ApprovalDecision::Rejected {
            reason: Some(reason.into()),
        })
    }
}

#[async_trait]
impl BudgetApprover for FixedApprover {
    async fn decide(&self, _plan: &TravelPlan, _summary: &str) -> Result<ApprovalDecision, GateError> {
        Ok(self.0.clone())
    }
}

/// Read one line with an editable default
fn ask(rl: &mut DefaultEditor, label: &str, default: Option<String>) -> Result<String, GateError> {
    let prompt = format!("{} ", format!("{}:", label).bright_green());
    let initial = default.unwrap_or_default();
    match rl.readline_with_initial(&prompt, (initial.as_str(), "")) {
        Ok(line) => Ok(line.trim().to_string()),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Err(GateError::Cancelled),
        Err(e) => Err(GateError::Console(e.to_string())),
    }
}

fn editor() -> Result<DefaultEditor, GateError> {
    DefaultEditor::new().map_err(|e| GateError::Console(format!("Failed to initialize readline: {}", e)))
}

/// Interactive form on the terminal, pre-filled from the hints
#[derive(Debug, Clone, Default)]
pub struct ConsoleGatherer;

#[async_trait]
impl RequirementsGatherer for ConsoleGatherer {
    async fn gather(&self, hints: &TripHints) -> Result<TripRequirements, GateError> {
        debug!(?hints, "ConsoleGatherer::gather: called");
        let hints = hints.clone();
        on_console(move || gather_from_console(hints)).await
    }
}

/// Run a blocking terminal interaction off the async workers
async fn on_console<T, F>(interaction: F) -> Result<T, GateError>
where
    F: FnOnce() -> Result<T, GateError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(interaction)
        .await
        .map_err(|e| GateError::Console(format!("Console task failed: {}", e)))?
}

fn gather_from_console(mut current: TripHints) -> Result<TripRequirements, GateError> {
    let mut rl = editor()?;

    println!();
    println!("{}", "Trip details".bright_cyan().bold());
    loop {
        let city = ask(&mut rl, "City", current.city.clone())?;
        let days = ask(&mut rl, "Number of days", current.number_of_days.map(|d| d.to_string()))?;
        let people = ask(&mut rl, "Number of people", current.number_of_people.map(|p| p.to_string()))?;
        let level = ask(
            &mut rl,
            "Budget level (Economy/Comfort/Premium)",
            current.budget_level.map(|l| l.to_string()),
        )?;

        current = TripHints {
            city: (!city.is_empty()).then_some(city),
            number_of_days: days.parse().ok(),
            number_of_people: people.parse().ok(),
            budget_level: level.parse::<BudgetLevel>().ok(),
        };
        match current.to_requirements() {
            Ok(requirements) => {
                info!(city = %requirements.city, "ConsoleGatherer::gather: confirmed");
                return Ok(requirements);
            }
            Err(e) => println!("{} {}", "Invalid:".red(), e),
        }
    }
}

/// Shows the plan and asks for a yes/no on the budget
#[derive(Debug, Clone, Default)]
pub struct ConsoleApprover;

#[async_trait]
impl BudgetApprover for ConsoleApprover {
    async fn decide(&self, _plan: &TravelPlan, summary: &str) -> Result<ApprovalDecision, GateError> {
        debug!("ConsoleApprover::decide: called");
        let summary = summary.to_string();
        on_console(move || decide_on_console(&summary)).await
    }
}

fn decide_on_console(summary: &str) -> Result<ApprovalDecision, GateError> {
    let mut rl = editor()?;

    println!();
    println!("{}", summary);
    println!();
    loop {
        let answer = ask(&mut rl, "Approve this budget? [y/n]", None)?;
        match answer.to_lowercase().as_str() {
            "y" | "yes" => return Ok(ApprovalDecision::Approved),
            "n" | "no" => {
                let reason = ask(&mut rl, "Reason (optional)", None)?;
                return Ok(ApprovalDecision::Rejected {
                    reason: (!reason.is_empty()).then_some(reason),
                });
            }
            _ => println!("Please answer {} or {}", "y".yellow(), "n".yellow()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> TripRequirements {
        TripRequirements::new("Tokyo", 3, 2, BudgetLevel::Comfort).unwrap()
    }

    #[tokio::test]
    async fn test_prefilled_prefers_explicit_requirements() {
        let gatherer = PrefilledGatherer::new(Some(tokyo()));
        let hints = TripHints {
            city: Some("Paris".to_string()),
            ..Default::default()
        };
        assert_eq!(gatherer.gather(&hints).await.unwrap(), tokyo());
    }

    #[tokio::test]
    async fn test_prefilled_requires_complete_hints() {
        let gatherer = PrefilledGatherer::default();
        let err = gatherer.gather(&TripHints::default()).await.unwrap_err();
        assert!(matches!(err, GateError::Invalid(_)));

        let hints = TripHints::from(&tokyo());
        assert_eq!(gatherer.gather(&hints).await.unwrap(), tokyo());
    }

    #[tokio::test]
    async fn test_prefilled_revalidates_explicit_requirements() {
        let mut bad = tokyo();
        bad.number_of_days = 0;
        let err = PrefilledGatherer::new(Some(bad)).gather(&TripHints::default()).await.unwrap_err();
        assert!(matches!(err, GateError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_fixed_approver() {
        let plan = TravelPlan::new(tokyo());
        assert_eq!(FixedApprover::approve().decide(&plan, "").await.unwrap(), ApprovalDecision::Approved);
        assert_eq!(
            FixedApprover::reject("too pricey").decide(&plan, "").await.unwrap(),
            ApprovalDecision::Rejected {
                reason: Some("too pricey".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_console_interaction_runs_off_the_runtime() {
        let handle = tokio::runtime::Handle::current();
        let requirements = on_console(move || {
            // Blocking inside an async worker would panic here
            handle.block_on(async { Ok(tokyo()) })
        })
        .await
        .unwrap();
        assert_eq!(requirements, tokyo());

        let err = on_console(|| -> Result<(), GateError> { Err(GateError::Cancelled) }).await.unwrap_err();
        assert!(matches!(err, GateError::Cancelled));
    }

    #[test]
    fn test_decision_wire_shape() {
        let json = serde_json::to_value(ApprovalDecision::Rejected { reason: None }).unwrap();
        assert_eq!(json, serde_json::json!({"decision": "rejected", "reason": null}));
    }
}
