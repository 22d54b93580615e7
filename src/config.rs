//! Configuration loading and constants.
//!
//! Loads service configuration from an optional TOML file, then applies the
//! environment-style overrides the services are deployed with (e.g.
//! `TOPPING_COMBO_SUGGESTER_URL`, `WEBAPP_URL`). `AppConfig` is the root
//! configuration struct; it is built once at startup and injected into
//! handlers through the service state.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

use crate::health::Dependency;
use crate::toppings::ToppingMode;

// =============================================================================
// Ports and URLs
// =============================================================================

/// Default listen port for the topping suggestion service
pub const SUGGESTION_DEFAULT_PORT: u16 = 5678;

/// Default listen port for the frontend service
pub const FRONTEND_DEFAULT_PORT: u16 = 5000;

/// Default listen port for the health checker
pub const HEALTH_CHECKER_DEFAULT_PORT: u16 = 5050;

/// Default listen address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Where the frontend looks for the suggestion service when nothing is configured
pub const DEFAULT_TOPPING_COMBO_SUGGESTER_URL: &str = formatcp!(
    "http://topping-suggestion-service:{}",
    SUGGESTION_DEFAULT_PORT
);

/// Path segment of every service's liveness endpoint
pub const HEALTH_CHECK_PATH: &str = "health-check";

/// Path segment of the suggestion endpoint
pub const TOPPING_COMBO_PATH: &str = "topping_combo";

// =============================================================================
// Timeouts
// =============================================================================

/// Timeout for the frontend's call to the suggestion service (milliseconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1000;

/// Timeout for each health probe (milliseconds)
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1000;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Every response is computed per request; suggestions and health must never be cached.
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Directory of plain-text topping lists
pub const DEFAULT_FOODS_DIR: &str = "foods";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "pizzeria=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Rendered in place of a status code when the upstream call never got a response
pub const UNKNOWN_STATUS_PLACEHOLDER: &str = "????";

/// Passphrase that unlocks the hidden pizza page when deployed as `SECRET_PIZZA_PASSWORD`
pub const SECRET_PIZZA_PASSPHRASE: &str = "extra-cheese-please";

// =============================================================================
// Environment Keys
// =============================================================================

pub const ENV_TOPPING_COMBO_SUGGESTER_URL: &str = "TOPPING_COMBO_SUGGESTER_URL";
pub const ENV_TOPPING_SUGGESTION_URL: &str = "TOPPING_SUGGESTION_URL";
pub const ENV_WEBAPP_URL: &str = "WEBAPP_URL";
pub const ENV_TOPPING_MODE: &str = "TOPPING_MODE";
pub const ENV_SHOW_PIZZA: &str = "SHOW_PIZZA";
pub const ENV_SECRET_PIZZA_PASSWORD: &str = "SECRET_PIZZA_PASSWORD";
pub const ENV_HOSTNAME: &str = "HOSTNAME";
pub const ENV_PORT: &str = "PORT";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Which of the services this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    ToppingSuggestion,
    Frontend,
    HealthChecker,
}

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::ToppingSuggestion => "topping-suggestion",
            ServiceKind::Frontend => "frontend",
            ServiceKind::HealthChecker => "health-checker",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::ToppingSuggestion => SUGGESTION_DEFAULT_PORT,
            ServiceKind::Frontend => FRONTEND_DEFAULT_PORT,
            ServiceKind::HealthChecker => HEALTH_CHECKER_DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener configuration
    pub http: HttpServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    pub suggestion: SuggestionConfig,
    pub frontend: FrontendConfig,
    pub health_checker: HealthCheckerConfig,
    /// Pod hostname, kept for log context only
    #[serde(skip)]
    pub hostname: Option<String>,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub host: String,
    /// Listen port; each service falls back to its own default when unset
    pub port: Option<u16>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: None,
        }
    }
}

impl HttpServerConfig {
    /// Get effective port (configured or the service default)
    pub fn port_for(&self, service: ServiceKind) -> u16 {
        self.port.unwrap_or_else(|| service.default_port())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Topping suggestion service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Directory the topping lists are read from at startup
    pub foods_dir: String,
    /// Raw `TOPPING_MODE` value; see [`SuggestionConfig::mode`]
    pub topping_mode: String,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            foods_dir: DEFAULT_FOODS_DIR.to_string(),
            topping_mode: String::new(),
        }
    }
}

impl SuggestionConfig {
    pub fn mode(&self) -> ToppingMode {
        ToppingMode::parse(&self.topping_mode)
    }
}

/// Frontend service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Base URL of the topping suggestion service
    pub topping_combo_suggester_url: String,
    /// Surface the pizza banner on the index page
    pub show_pizza: bool,
    /// Deployment-time secret compared against [`SECRET_PIZZA_PASSPHRASE`]
    pub secret_pizza_password: Option<String>,
    /// Timeout for the suggestion call in milliseconds (default: 1000)
    pub request_timeout_ms: u64,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            topping_combo_suggester_url: DEFAULT_TOPPING_COMBO_SUGGESTER_URL.to_string(),
            show_pizza: false,
            secret_pizza_password: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl FrontendConfig {
    /// Full URL of the suggestion endpoint
    pub fn topping_combo_endpoint(&self) -> String {
        join_url(&self.topping_combo_suggester_url, TOPPING_COMBO_PATH)
    }

    /// Whether the configured secret unlocks the hidden page
    pub fn secret_unlocked(&self) -> bool {
        self.secret_pizza_password
            .as_deref()
            .map(|password| secrets_match(password, SECRET_PIZZA_PASSPHRASE))
            .unwrap_or(false)
    }
}

/// Health checker settings. Both dependency URLs are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthCheckerConfig {
    pub topping_suggestion_url: Option<String>,
    pub webapp_url: Option<String>,
    /// Timeout for each probe in milliseconds (default: 1000)
    pub probe_timeout_ms: u64,
}

impl Default for HealthCheckerConfig {
    fn default() -> Self {
        Self {
            topping_suggestion_url: None,
            webapp_url: None,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

impl HealthCheckerConfig {
    /// The dependencies to probe, in display order.
    ///
    /// Fails if either base URL is missing; there is no sensible default
    /// target for a health probe.
    pub fn dependencies(&self) -> Result<Vec<Dependency>, ConfigError> {
        let topping_suggestion = required(&self.topping_suggestion_url, ENV_TOPPING_SUGGESTION_URL)?;
        let webapp = required(&self.webapp_url, ENV_WEBAPP_URL)?;

        Ok(vec![
            Dependency::new("topping-suggestion service", topping_suggestion),
            Dependency::new("webapp service", webapp),
        ])
    }
}

fn required(value: &Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, or defaults when no path is given.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents)?
            }
            None => AppConfig::default(),
        };
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply environment-style overrides using the given lookup.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_TOPPING_COMBO_SUGGESTER_URL) {
            self.frontend.topping_combo_suggester_url = url;
        }
        if let Some(url) = get(ENV_TOPPING_SUGGESTION_URL) {
            self.health_checker.topping_suggestion_url = Some(url);
        }
        if let Some(url) = get(ENV_WEBAPP_URL) {
            self.health_checker.webapp_url = Some(url);
        }
        if let Some(mode) = get(ENV_TOPPING_MODE) {
            self.suggestion.topping_mode = mode;
        }
        if let Some(flag) = get(ENV_SHOW_PIZZA) {
            self.frontend.show_pizza = parse_flag(&flag);
        }
        if let Some(password) = get(ENV_SECRET_PIZZA_PASSWORD) {
            self.frontend.secret_pizza_password = Some(password);
        }
        if let Some(hostname) = get(ENV_HOSTNAME) {
            self.hostname = Some(hostname);
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            self.logging.format = format;
        }
        if let Some(port) = get(ENV_PORT) {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::Validation(format!("{}={:?}: {}", ENV_PORT, port, e)))?;
            self.http.port = Some(port);
        }

        Ok(())
    }
}

/// Interpret a feature-flag value ("1", "true", "yes", "on").
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Join a base URL and a path segment with exactly one slash between them.
pub fn join_url(base: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}

/// Compare two secrets without short-circuiting on the first differing byte.
fn secrets_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),
    #[error("Configuration error: {0}")]
    Validation(String),
}
