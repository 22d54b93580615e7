//! HTTP route handlers for the three services.
//!
//! Each service gets its own router. Every response is computed per request,
//! so all routes carry `Cache-Control: no-store`.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod frontend;
pub mod health;
pub mod health_checker;
pub mod suggestion;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::request_id_layer;
use crate::state::{FrontendState, HealthCheckerState, SuggestionState};

/// Wrap a service router with the layers every service shares.
fn with_common_layers(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

/// Router of the topping suggestion service.
pub fn suggestion_router(state: SuggestionState) -> Router {
    let router = Router::new()
        .route("/health-check", get(health::health_check))
        .route("/topping_combo", get(suggestion::topping_combo))
        .with_state(state);
    with_common_layers(router)
}

/// Router of the frontend service.
pub fn frontend_router(state: FrontendState) -> Router {
    let router = Router::new()
        .route("/", get(frontend::index))
        .route("/health-check", get(health::health_check))
        .route("/pizza", get(frontend::pizza))
        .route("/secret", get(frontend::secret))
        .with_state(state);
    with_common_layers(router)
}

/// Router of the health checker.
pub fn health_checker_router(state: HealthCheckerState) -> Router {
    let router = Router::new()
        .route("/", get(health_checker::index))
        .route("/health-check", get(health::health_check))
        .route("/status.json", get(health_checker::status_json))
        .with_state(state);
    with_common_layers(router)
}
