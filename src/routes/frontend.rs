//! Frontend pages.
//!
//! The index page always renders: a failed suggestion call becomes an
//! error list on the page instead of an error response.

use axum::{extract::State, response::Html, Extension};
use tracing::instrument;

use crate::error::{AppError, AppErrorResponse, ResultExt};
use crate::middleware::RequestId;
use crate::state::FrontendState;
use crate::upstream::SuggestionView;

/// Emoji banner served at `/pizza`
pub const PIZZA_BANNER: &str = "🍕🍕\n🥤\n🎉🎉🎉🎉🎉\n";

/// Index page with a topping suggestion or the reasons there is none.
#[instrument(name = "frontend::index", skip(state, request_id))]
pub async fn index(
    State(state): State<FrontendState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Html<String>, AppErrorResponse> {
    let response = state.suggestions.fetch_topping_combo().await;
    let view = SuggestionView::from_response(&response, state.suggestions.base_url());

    if let Some(errors) = &view.errors {
        tracing::warn!(
            status = %response.status_display(),
            errors = errors.len(),
            "Rendering index without a suggestion"
        );
    }

    let mut context = tera::Context::new();
    context.insert("topping_combo", &view.topping_combo);
    context.insert("errors", &view.errors);
    context.insert("show_pizza", &state.config.frontend.show_pizza);
    context.insert("secret_unlocked", &state.config.frontend.secret_unlocked());

    let html = state
        .tera
        .render("frontend/index.html", &context)
        .with_request_id(&request_id)?;
    Ok(Html(html))
}

pub async fn pizza() -> &'static str {
    PIZZA_BANNER
}

/// Hidden page, available only when the deployment's secret matches.
#[instrument(name = "frontend::secret", skip(state, request_id))]
pub async fn secret(
    State(state): State<FrontendState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Html<String>, AppErrorResponse> {
    if !state.config.frontend.secret_unlocked() {
        return Err(AppErrorResponse {
            error: AppError::NotFound,
            request_id: Some(request_id),
        });
    }

    let mut context = tera::Context::new();
    context.insert("pizza", PIZZA_BANNER);

    let html = state
        .tera
        .render("frontend/secret.html", &context)
        .with_request_id(&request_id)?;
    Ok(Html(html))
}
