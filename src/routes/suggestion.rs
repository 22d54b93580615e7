//! Topping combo endpoint.

use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::error::{JsonErrorResponse, ResultExt};
use crate::middleware::RequestId;
use crate::state::SuggestionState;
use crate::toppings::ToppingCombo;

/// Returns three random distinct toppings and their description.
#[instrument(name = "suggestion::topping_combo", skip(state, request_id))]
pub async fn topping_combo(
    State(state): State<SuggestionState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<ToppingCombo>, JsonErrorResponse> {
    let combo = state
        .toppings
        .suggest_combo(&mut rand::thread_rng(), state.mode)
        .with_request_id(&request_id)?;

    tracing::debug!(toppings = ?combo.toppings, "Suggested combo");
    Ok(Json(combo))
}
