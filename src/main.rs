//! Pizzeria: toy pizza microservices.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration from an optional TOML file plus environment overrides,
//! builds the state for the selected service, and starts the HTTP server.

use clap::{Parser, Subcommand};

use pizzeria::config::{AppConfig, ServiceKind, DEFAULT_LOG_FILTER};
use pizzeria::http::start_server;
use pizzeria::logging;
use pizzeria::routes::{frontend_router, health_checker_router, suggestion_router};
use pizzeria::state::{FrontendState, HealthCheckerState, SuggestionState};
use pizzeria::templates::init_templates;
use pizzeria::toppings::ToppingList;

/// Pizzeria: topping suggestions, a frontend, and a health checker
#[derive(Parser, Debug)]
#[command(name = "pizzeria", version, about)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level filter (e.g., "pizzeria=debug,tower_http=info")
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    service: Service,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Service {
    /// Serve random topping combos
    ToppingSuggestion,
    /// Serve the pizza suggestion page
    Frontend,
    /// Serve the aggregated health of the other services
    HealthChecker,
}

impl From<Service> for ServiceKind {
    fn from(service: Service) -> Self {
        match service {
            Service::ToppingSuggestion => ServiceKind::ToppingSuggestion,
            Service::Frontend => ServiceKind::Frontend,
            Service::HealthChecker => ServiceKind::HealthChecker,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let service = ServiceKind::from(args.service);

    // Load configuration before tracing so the log format can be configured
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_process_env()?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    logging::init(&log_filter, config.logging.is_json())?;

    tracing::info!(
        service = service.name(),
        hostname = config.hostname.as_deref().unwrap_or("unknown"),
        "Loaded configuration"
    );

    let app = match service {
        ServiceKind::ToppingSuggestion => {
            // Fatal: without toppings the service cannot serve suggestions
            let toppings = ToppingList::load(&config.suggestion.foods_dir)?;
            tracing::info!(
                foods_dir = %config.suggestion.foods_dir,
                toppings = toppings.len(),
                mode = ?config.suggestion.mode(),
                "Loaded toppings"
            );
            if toppings.len() < pizzeria::toppings::COMBO_SIZE {
                tracing::warn!(
                    toppings = toppings.len(),
                    "Too few toppings; suggestions will fail"
                );
            }
            suggestion_router(SuggestionState::from_config(&config, toppings))
        }
        ServiceKind::Frontend => {
            let tera = init_templates()?;
            tracing::info!(
                suggester_url = %config.frontend.topping_combo_suggester_url,
                show_pizza = config.frontend.show_pizza,
                "Initialized frontend"
            );
            frontend_router(FrontendState::new(config.clone(), tera)?)
        }
        ServiceKind::HealthChecker => {
            let tera = init_templates()?;
            let state = HealthCheckerState::new(&config, tera)?;
            for dependency in state.aggregator.dependencies() {
                tracing::info!(
                    label = %dependency.label,
                    endpoint = %dependency.health_check_endpoint(),
                    "Health probe configured"
                );
            }
            health_checker_router(state)
        }
    };

    start_server(app, &config.http, service).await?;

    Ok(())
}
