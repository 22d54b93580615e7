//! Aggregated health views.

use axum::{extract::State, response::Html, Extension, Json};
use tracing::instrument;

use crate::error::{AppErrorResponse, ResultExt};
use crate::health::HealthCheckResult;
use crate::middleware::RequestId;
use crate::state::HealthCheckerState;

/// Status table of every dependency, probed fresh on each request.
#[instrument(name = "health_checker::index", skip(state, request_id))]
pub async fn index(
    State(state): State<HealthCheckerState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Html<String>, AppErrorResponse> {
    let health_checks = state.aggregator.aggregate().await;

    let unhealthy = health_checks.iter().filter(|c| !c.healthy).count();
    if unhealthy > 0 {
        tracing::warn!(unhealthy, total = health_checks.len(), "Unhealthy dependencies");
    }

    let mut context = tera::Context::new();
    context.insert("health_checks", &health_checks);

    let html = state
        .tera
        .render("health_checker/index.html", &context)
        .with_request_id(&request_id)?;
    Ok(Html(html))
}

/// The same results as JSON.
#[instrument(name = "health_checker::status_json", skip(state))]
pub async fn status_json(State(state): State<HealthCheckerState>) -> Json<Vec<HealthCheckResult>> {
    Json(state.aggregator.aggregate().await)
}
