//! Tripweave configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::AgentKind;

/// Main Tripweave configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level used when none is given on the command line
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Model provider configuration
    pub llm: LlmConfig,

    /// Listening addresses for the agents and the orchestrator
    pub agents: AgentsConfig,
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file(config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Log level from the config file only, read before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_file(config_path).ok().and_then(|config| config.log_level)
    }

    fn load_file(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tripweave.yml
        let local_config = PathBuf::from(".tripweave.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tripweave/tripweave.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tripweave").join("tripweave.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply `*_PORT` and model environment variables on top of the file values
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        debug!("apply_env_overrides: called");
        for kind in AgentKind::ALL {
            if let Some(port) = port_from_env(kind.port_env()) {
                self.agents.set_port(kind, port);
            }
        }
        if let Some(port) = port_from_env(ORCHESTRATOR_PORT_ENV) {
            self.agents.orchestrator_port = port;
        }

        if let Ok(model) = std::env::var("TRIPWEAVE_MODEL") {
            debug!(%model, "apply_env_overrides: model from TRIPWEAVE_MODEL");
            self.llm.model = Some(model);
        } else if self.llm.provider == Provider::Gemini
            && let Ok(model) = std::env::var("GEMINI_MODEL")
        {
            debug!(%model, "apply_env_overrides: model from GEMINI_MODEL");
            self.llm.model = Some(model);
        }
    }

    /// Warnings for missing model credentials
    ///
    /// A missing key never prevents startup; the first model call fails instead.
    pub fn credential_warnings(&self) -> Vec<String> {
        debug!("credential_warnings: called");
        match self.llm.api_key() {
            Ok(_) => Vec::new(),
            Err(_) => {
                let vars = self.llm.api_key_candidates().join(" or ");
                vec![format!("Model credential not set. Set {} to enable model calls.", vars)]
            }
        }
    }
}

/// Environment variable for the orchestrator port
pub const ORCHESTRATOR_PORT_ENV: &str = "ORCHESTRATOR_PORT";

fn port_from_env(var: &str) -> Option<u16> {
    let value = std::env::var(var).ok()?;
    match value.trim().parse::<u16>() {
        Ok(port) => {
            debug!(%var, port, "port_from_env: override");
            Some(port)
        }
        Err(e) => {
            warn!(%var, %value, error = %e, "port_from_env: ignoring invalid port");
            None
        }
    }
}

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAI,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAI => "gpt-4o-mini",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Provider::Gemini => "GOOGLE_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com",
            Provider::OpenAI => "https://api.openai.com",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Model provider configuration
///
/// Unset model, key variable and base URL fall back to the provider's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: gemini or openai
    pub provider: Provider,

    /// Model identifier
    pub model: Option<String>,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            model: None,
            api_key_env: None,
            base_url: None,
            max_tokens: 8192,
            timeout_ms: 120_000,
            temperature: None,
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(self.provider.default_base_url())
            .trim_end_matches('/')
    }

    /// Environment variables checked for the API key, in order
    pub fn api_key_candidates(&self) -> Vec<String> {
        let mut vars = vec![
            self.api_key_env
                .clone()
                .unwrap_or_else(|| self.provider.default_api_key_env().to_string()),
        ];
        if self.provider == Provider::Gemini && !vars.iter().any(|v| v == "GEMINI_API_KEY") {
            vars.push("GEMINI_API_KEY".to_string());
        }
        vars
    }

    /// Resolve the API key from the environment
    pub fn api_key(&self) -> Result<String, crate::llm::LlmError> {
        let candidates = self.api_key_candidates();
        candidates
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| crate::llm::LlmError::MissingCredential(candidates.join(" or ")))
    }
}

/// Agent listening configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Bind address
    pub host: String,

    /// Host name advertised in agent cards and used to reach remote agents
    #[serde(rename = "public-host")]
    pub public_host: String,

    #[serde(rename = "itinerary-port")]
    pub itinerary_port: u16,

    #[serde(rename = "weather-port")]
    pub weather_port: u16,

    #[serde(rename = "restaurant-port")]
    pub restaurant_port: u16,

    #[serde(rename = "budget-port")]
    pub budget_port: u16,

    #[serde(rename = "orchestrator-port")]
    pub orchestrator_port: u16,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            public_host: "localhost".to_string(),
            itinerary_port: AgentKind::Itinerary.default_port(),
            weather_port: AgentKind::Weather.default_port(),
            restaurant_port: AgentKind::Restaurant.default_port(),
            budget_port: AgentKind::Budget.default_port(),
            orchestrator_port: 9000,
        }
    }
}

impl AgentsConfig {
    pub fn port(&self, kind: AgentKind) -> u16 {
        match kind {
            AgentKind::Itinerary => self.itinerary_port,
            AgentKind::Weather => self.weather_port,
            AgentKind::Restaurant => self.restaurant_port,
            AgentKind::Budget => self.budget_port,
        }
    }

    pub fn set_port(&mut self, kind: AgentKind, port: u16) {
        match kind {
            AgentKind::Itinerary => self.itinerary_port = port,
            AgentKind::Weather => self.weather_port = port,
            AgentKind::Restaurant => self.restaurant_port = port,
            AgentKind::Budget => self.budget_port = port,
        }
    }

    /// Base URL other processes use to reach the agent
    pub fn public_url(&self, kind: AgentKind) -> String {
        format!("http://{}:{}/", self.public_host, self.port(kind))
    }

    pub fn bind_addr(&self, port: u16) -> String {
        format!("{}:{}", self.host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        // SAFETY: tests touching the environment run under #[serial]
        unsafe {
            for kind in AgentKind::ALL {
                std::env::remove_var(kind.port_env());
            }
            std::env::remove_var(ORCHESTRATOR_PORT_ENV);
            std::env::remove_var("TRIPWEAVE_MODEL");
            std::env::remove_var("GEMINI_MODEL");
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, Provider::Gemini);
        assert_eq!(config.llm.model(), "gemini-2.5-flash");
        assert_eq!(config.agents.itinerary_port, 9001);
        assert_eq!(config.agents.budget_port, 9002);
        assert_eq!(config.agents.restaurant_port, 9003);
        assert_eq!(config.agents.weather_port, 9005);
        assert_eq!(config.agents.orchestrator_port, 9000);
    }

    #[test]
    fn test_provider_defaults() {
        let config: LlmConfig = serde_yaml::from_str("provider: openai").unwrap();

        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.base_url(), "https://api.openai.com");
        assert_eq!(config.api_key_candidates(), vec!["OPENAI_API_KEY".to_string()]);
    }

    #[test]
    fn test_gemini_key_candidates_include_fallback() {
        let config = LlmConfig::default();
        assert_eq!(
            config.api_key_candidates(),
            vec!["GOOGLE_API_KEY".to_string(), "GEMINI_API_KEY".to_string()]
        );
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: debug
llm:
  provider: openai
  model: gpt-4o
  api-key-env: MY_API_KEY
  base-url: https://llm.example.com/
  max-tokens: 4096
  timeout-ms: 60000
  temperature: 0.2
agents:
  public-host: planner.internal
  itinerary-port: 7001
  orchestrator-port: 7000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.llm.model(), "gpt-4o");
        assert_eq!(config.llm.base_url(), "https://llm.example.com");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.llm.temperature, Some(0.2));
        assert_eq!(config.agents.port(AgentKind::Itinerary), 7001);
        assert_eq!(config.agents.port(AgentKind::Weather), 9005);
        assert_eq!(config.agents.public_url(AgentKind::Itinerary), "http://planner.internal:7001/");
    }

    #[test]
    #[serial]
    fn test_load_explicit_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "agents:\n  budget-port: 8802").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.agents.budget_port, 8802);
    }

    #[test]
    #[serial]
    fn test_load_missing_explicit_file_fails() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_ports_and_model() {
        clear_env();
        // SAFETY: serialized
        unsafe {
            std::env::set_var("WEATHER_PORT", "9105");
            std::env::set_var("BUDGET_PORT", "not-a-port");
            std::env::set_var("GEMINI_MODEL", "gemini-2.0-flash");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.agents.weather_port, 9105);
        assert_eq!(config.agents.budget_port, 9002);
        assert_eq!(config.llm.model(), "gemini-2.0-flash");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_credential_warnings_never_fail() {
        let config: Config = serde_yaml::from_str("llm:\n  api-key-env: TRIPWEAVE_TEST_UNSET_KEY").unwrap();
        // SAFETY: serialized
        unsafe {
            std::env::remove_var("TRIPWEAVE_TEST_UNSET_KEY");
            std::env::remove_var("GEMINI_API_KEY");
        }
        let warnings = config.credential_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("TRIPWEAVE_TEST_UNSET_KEY or GEMINI_API_KEY"));

        unsafe {
            std::env::set_var("TRIPWEAVE_TEST_UNSET_KEY", "k");
        }
        assert!(config.credential_warnings().is_empty());
        unsafe {
            std::env::remove_var("TRIPWEAVE_TEST_UNSET_KEY");
        }
    }
}
