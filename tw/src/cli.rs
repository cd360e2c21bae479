//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::AgentKind;

/// Tripweave - multi-agent travel planner
#[derive(Parser)]
#[command(
    name = "tw",
    about = "Plan trips with itinerary, weather, restaurant and budget agents",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve one agent over A2A on its configured port
    Agent {
        /// Agent to serve (itinerary, weather, restaurant, budget)
        #[arg(value_name = "KIND", value_parser = parse_agent_kind)]
        kind: AgentKind,
    },

    /// Serve all four agents and the orchestrator in one process
    Serve,

    /// Plan a trip interactively
    Plan {
        /// Free-text request, e.g. "3 days in Tokyo for two, mid-range"
        #[arg(value_name = "REQUEST")]
        request: Option<String>,

        /// Call agents over HTTP at their configured URLs instead of in-process
        #[arg(short, long)]
        remote: bool,

        /// Approve the proposed budget without asking
        #[arg(short, long)]
        yes: bool,

        /// Print the final plan as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Print an agent's discovery card
    Card {
        /// Agent whose card to print
        #[arg(value_name = "KIND", value_parser = parse_agent_kind)]
        kind: AgentKind,
    },
}

fn parse_agent_kind(s: &str) -> Result<AgentKind, String> {
    debug!(%s, "parse_agent_kind: called");
    s.parse()
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripweave")
        .join("logs")
        .join("tw.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with credential checks and the log path
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Model Credentials:\n");
    for var in ["GOOGLE_API_KEY", "GEMINI_API_KEY", "OPENAI_API_KEY"] {
        let set = std::env::var(var).is_ok_and(|v| !v.trim().is_empty());
        let icon = if set { "\u{2705}" } else { "\u{274C}" };
        help.push_str(&format!("  {} {}\n", icon, var));
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}
