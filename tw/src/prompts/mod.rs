//! Prompt Template System
//!
//! Loads agent instructions, delegation queries and the plan summary from
//! `.pmt` (prompt template) files.
//!
//! Template loading chain:
//! 1. `.tripweave/prompts/{name}.pmt` (project override)
//! 2. `~/.config/tripweave/prompts/{name}.pmt` (user override)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{DelegationContext, PromptError, PromptLoader, SummaryContext};
