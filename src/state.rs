//! Shared state for each service's request handlers.
//!
//! Everything here is built once at startup and only read afterwards, so
//! handlers share it through `Arc`s without locking.

use std::sync::Arc;
use std::time::Duration;

use tera::Tera;

use crate::config::{AppConfig, ConfigError};
use crate::health::HealthAggregator;
use crate::toppings::{ToppingList, ToppingMode};
use crate::upstream::ToppingSuggestionClient;

/// State of the topping suggestion service.
#[derive(Clone)]
pub struct SuggestionState {
    pub toppings: Arc<ToppingList>,
    pub mode: ToppingMode,
}

impl SuggestionState {
    pub fn new(toppings: ToppingList, mode: ToppingMode) -> Self {
        Self {
            toppings: Arc::new(toppings),
            mode,
        }
    }

    pub fn from_config(config: &AppConfig, toppings: ToppingList) -> Self {
        Self::new(toppings, config.suggestion.mode())
    }
}

/// State of the frontend service.
#[derive(Clone)]
pub struct FrontendState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub suggestions: ToppingSuggestionClient,
}

impl FrontendState {
    pub fn new(config: AppConfig, tera: Tera) -> Result<Self, reqwest::Error> {
        let suggestions = ToppingSuggestionClient::new(&config.frontend)?;
        Ok(Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            suggestions,
        })
    }
}

/// State of the health checker.
#[derive(Clone)]
pub struct HealthCheckerState {
    pub tera: Arc<Tera>,
    pub aggregator: HealthAggregator,
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl HealthCheckerState {
    /// Fails when a dependency URL is not configured.
    pub fn new(config: &AppConfig, tera: Tera) -> Result<Self, StateError> {
        let dependencies = config.health_checker.dependencies()?;
        let timeout = Duration::from_millis(config.health_checker.probe_timeout_ms);
        let aggregator = HealthAggregator::new(dependencies, timeout)?;
        Ok(Self {
            tera: Arc::new(tera),
            aggregator,
        })
    }
}
