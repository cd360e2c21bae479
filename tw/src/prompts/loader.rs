//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::embedded;
use crate::domain::{
    AgentKind, BudgetDoc, BudgetStatus, DayItinerary, DayMeals, PlanSlot, TravelPlan, TripRequirements, WeatherDoc,
};

/// Errors from loading or rendering a template
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt template not found: {0}")]
    NotFound(String),

    #[error("Failed to read prompt {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: handlebars::RenderError,
    },
}

/// Context for the orchestrator's per-agent queries
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationContext {
    pub city: String,
    pub number_of_days: u32,
    pub number_of_people: u32,
    pub budget_level: String,
    pub solo: bool,
}

impl From<&TripRequirements> for DelegationContext {
    fn from(req: &TripRequirements) -> Self {
        Self {
            city: req.city.clone(),
            number_of_days: req.number_of_days,
            number_of_people: req.number_of_people,
            budget_level: req.budget_level.to_string(),
            solo: req.number_of_people == 1,
        }
    }
}

/// Context for the combined plan summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryContext<'a> {
    pub requirements: &'a TripRequirements,
    pub days: &'a [DayItinerary],
    /// Restaurant meals with no itinerary to carry them
    pub meals: &'a [DayMeals],
    pub itinerary_error: Option<&'a str>,
    pub meals_error: Option<&'a str>,
    pub weather: Option<&'a WeatherDoc>,
    pub best_days: String,
    pub weather_error: Option<&'a str>,
    pub budget: Option<&'a BudgetDoc>,
    pub budget_status: &'static str,
    pub budget_error: Option<&'a str>,
}

fn slot_error<T>(slot: &Option<PlanSlot<T>>) -> Option<&str> {
    slot.as_ref().and_then(PlanSlot::error)
}

impl<'a> SummaryContext<'a> {
    pub fn from_plan(plan: &'a TravelPlan) -> Self {
        debug!(city = %plan.requirements.city, "SummaryContext::from_plan: called");
        let weather = plan.weather.as_ref().and_then(PlanSlot::ready);
        let best_days = weather
            .map(|w| {
                w.best_days
                    .iter()
                    .map(|d| format!("Day {}", d))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        let days = plan.days();
        let meals: &[DayMeals] = match days {
            Some(_) => &[],
            None => plan
                .meals
                .as_ref()
                .and_then(PlanSlot::ready)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        };

        Self {
            requirements: &plan.requirements,
            days: days.unwrap_or(&[]),
            meals,
            itinerary_error: slot_error(&plan.itinerary),
            meals_error: slot_error(&plan.meals),
            weather,
            best_days,
            weather_error: slot_error(&plan.weather),
            budget: plan.proposed_budget(),
            budget_status: match plan.budget_status {
                BudgetStatus::Pending => "pending approval",
                BudgetStatus::Approved => "approved",
                BudgetStatus::Rejected { .. } => "rejected",
            },
            budget_error: slot_error(&plan.budget),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Override directories, searched in order
    dirs: Vec<PathBuf>,
}

impl PromptLoader {
    /// Create a loader for the given project root
    ///
    /// Searches `<root>/.tripweave/prompts/`, then the user's config dir.
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref();
        debug!(?root, "PromptLoader::new: called");

        let mut candidates = vec![root.join(".tripweave/prompts")];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("tripweave").join("prompts"));
        }
        let dirs = candidates
            .into_iter()
            .filter(|dir| {
                let exists = dir.is_dir();
                debug!(?dir, %exists, "PromptLoader::new: checking directory");
                exists
            })
            .collect();

        Self::with_dirs(dirs)
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self::with_dirs(Vec::new())
    }

    fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs, dirs }
    }

    /// Load a template by name: override directories first, then embedded
    pub fn load_template(&self, name: &str) -> Result<String, PromptError> {
        debug!(%name, "PromptLoader::load_template: called");
        for dir in &self.dirs {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path).map_err(|source| PromptError::Read { path, source });
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, PromptError> {
        debug!(%name, "PromptLoader::render: called");
        let template = self.load_template(name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|source| PromptError::Render {
                name: name.to_string(),
                source,
            })
    }

    /// Instruction text for an agent
    pub fn instruction(&self, kind: AgentKind) -> Result<String, PromptError> {
        self.load_template(&embedded::instruction_name(kind))
    }

    /// Query the orchestrator sends to an agent
    pub fn delegation(&self, kind: AgentKind, requirements: &TripRequirements) -> Result<String, PromptError> {
        let rendered = self.render(&embedded::delegation_name(kind), &DelegationContext::from(requirements))?;
        Ok(rendered.trim().to_string())
    }

    /// Human-readable rendering of a plan
    pub fn summary(&self, plan: &TravelPlan) -> Result<String, PromptError> {
        let rendered = self.render("plan-summary", &SummaryContext::from_plan(plan))?;
        Ok(rendered.trim_end().to_string())
    }
}
