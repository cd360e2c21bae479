//! Tripweave - Multi-Agent Travel Planner
//!
//! CLI entry point for serving agents and planning trips.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use tripweave::a2a::{A2aState, a2a_router, serve};
use tripweave::agent::{AgentCard, AgentExecutor, AgentSpec};
use tripweave::cli::{Cli, Command, generate_after_help, get_log_path};
use tripweave::config::Config;
use tripweave::domain::AgentKind;
use tripweave::llm::create_client;
use tripweave::orchestrator::{
    BudgetApprover, ConsoleApprover, ConsoleGatherer, FixedApprover, OrchestrationController, PlannerState,
    WorkflowState, planner_router,
};
use tripweave::prompts::PromptLoader;
use tripweave::transport::{AgentTransport, HttpTransport, LocalTransport};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn project_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model(), "Tripweave loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Agent { kind } => {
            warn_missing_credentials(&config);
            cmd_agent(&config, kind).await
        }
        Command::Serve => {
            warn_missing_credentials(&config);
            cmd_serve(&config).await
        }
        Command::Plan {
            request,
            remote,
            yes,
            json,
        } => {
            if !remote {
                warn_missing_credentials(&config);
            }
            cmd_plan(&config, request.unwrap_or_default(), remote, yes, json).await
        }
        Command::Card { kind } => cmd_card(&config, kind),
    }
}

/// Missing credentials are reported, never fatal
fn warn_missing_credentials(config: &Config) {
    for warning in config.credential_warnings() {
        warn!("{}", warning);
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }
}

async fn bind(config: &Config, port: u16) -> Result<TcpListener> {
    let addr = config.agents.bind_addr(port);
    TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))
}

fn agent_state(config: &Config, executor: AgentExecutor) -> A2aState {
    let card = AgentCard::new(executor.endpoint().spec(), config.agents.public_url(executor.kind()));
    A2aState::new(executor, card)
}

async fn cmd_agent(config: &Config, kind: AgentKind) -> Result<()> {
    debug!(%kind, "cmd_agent: called");
    let llm = create_client(&config.llm).context("Failed to create model client")?;
    let prompts = PromptLoader::new(project_root());
    let executor = AgentExecutor::for_kind(kind, llm, &prompts, &config.llm).context("Failed to load agent prompt")?;

    let port = config.agents.port(kind);
    let listener = bind(config, port).await?;
    println!(
        "{} {} agent listening on {}",
        "\u{2713}".green(),
        kind,
        config.agents.public_url(kind).cyan()
    );
    serve(listener, a2a_router(agent_state(config, executor)))
        .await
        .context("Agent server failed")
}

async fn cmd_serve(config: &Config) -> Result<()> {
    debug!("cmd_serve: called");
    let llm = create_client(&config.llm).context("Failed to create model client")?;
    let prompts = Arc::new(PromptLoader::new(project_root()));
    let transport = LocalTransport::from_client(llm, &prompts, &config.llm).context("Failed to load agent prompts")?;

    let mut handles = Vec::new();
    for kind in AgentKind::ALL {
        let Some(executor) = transport.executor(kind).cloned() else {
            continue;
        };
        let listener = bind(config, config.agents.port(kind)).await?;
        println!("{} {} agent on {}", "\u{2713}".green(), kind, config.agents.public_url(kind).cyan());
        let router = a2a_router(agent_state(config, executor));
        handles.push(tokio::spawn(serve(listener, router)));
    }

    let listener = bind(config, config.agents.orchestrator_port).await?;
    println!(
        "{} orchestrator on http://{}:{}/plan",
        "\u{2713}".green(),
        config.agents.public_host,
        config.agents.orchestrator_port
    );
    let planner = planner_router(PlannerState::new(Arc::new(transport), prompts));
    handles.push(tokio::spawn(serve(listener, planner)));

    for handle in handles {
        handle.await.context("Server task panicked")?.context("Server failed")?;
    }
    info!("cmd_serve: all servers stopped");
    Ok(())
}

async fn cmd_plan(config: &Config, request: String, remote: bool, yes: bool, json: bool) -> Result<()> {
    debug!(remote, yes, json, "cmd_plan: called");
    let prompts = Arc::new(PromptLoader::new(project_root()));
    let transport: Arc<dyn AgentTransport> = if remote {
        Arc::new(HttpTransport::new(config).context("Failed to create HTTP transport")?)
    } else {
        let llm = create_client(&config.llm).context("Failed to create model client")?;
        Arc::new(LocalTransport::from_client(llm, &prompts, &config.llm).context("Failed to load agent prompts")?)
    };

    let mut controller = OrchestrationController::with_new_session(transport, prompts);
    controller
        .gather(&request, &ConsoleGatherer)
        .await
        .context("Failed to gather trip requirements")?;

    println!();
    while let Some(kind) = controller.state().pending_agent() {
        println!("{} Asking the {} agent...", "\u{2192}".cyan(), kind);
        let report = controller.step().await?;
        match report.error {
            None => println!("  {} {}", "\u{2713}".green(), kind),
            Some(error) => println!("  {} {}: {}", "\u{2717}".red(), kind, error),
        }
    }

    if controller.state() == WorkflowState::AwaitingApproval {
        let summary = controller.summary()?;
        let approver: Box<dyn BudgetApprover> = if yes {
            Box::new(FixedApprover::approve())
        } else {
            Box::new(ConsoleApprover)
        };
        let plan = controller.plan().cloned().ok_or_else(|| eyre::eyre!("No plan to approve"))?;
        let decision = approver.decide(&plan, &summary).await?;
        controller.resolve_approval(decision)?;
    }

    println!();
    if json {
        let plan = controller.plan().ok_or_else(|| eyre::eyre!("No plan produced"))?;
        println!("{}", serde_json::to_string_pretty(plan)?);
    } else {
        println!("{}", controller.summary()?);
    }

    match controller.state() {
        WorkflowState::Complete => println!("\n{}", "Plan complete.".bright_green().bold()),
        WorkflowState::Rejected => println!("\n{}", "Budget rejected; plan closed.".yellow()),
        other => warn!(state = %other, "cmd_plan: ended in non-terminal state"),
    }
    Ok(())
}

fn cmd_card(config: &Config, kind: AgentKind) -> Result<()> {
    debug!(%kind, "cmd_card: called");
    let prompts = PromptLoader::new(project_root());
    let spec = AgentSpec::load(kind, &prompts).context("Failed to load agent prompt")?;
    let card = AgentCard::new(&spec, config.agents.public_url(kind));
    println!("{}", serde_json::to_string_pretty(&card)?);
    Ok(())
}
