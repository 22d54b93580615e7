//! Per-request correlation for the pizzeria services.
//!
//! Every inbound request (page render, topping combo, health probe) gets a
//! UUID v4 and a `request` span. Outbound calls made while handling it, such
//! as the frontend's suggestion fetch or the checker's probes, log inside that
//! span, so a failing dependency can be traced back to the page that hit it.
//! Error pages and JSON errors echo the same ID.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Request ID, available to handlers as an `Extension`.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Tag the request with a [`RequestId`] and log its status and duration.
///
/// Installed as the outermost layer of each service router.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = RequestId(Uuid::new_v4());
    let span = tracing::info_span!(
        "request",
        request_id = %request_id.0,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    request.extensions_mut().insert(request_id);
    let start = Instant::now();

    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        if response.status().is_server_error() {
            tracing::warn!(status = response.status().as_u16(), duration_ms, "Request failed");
        } else {
            tracing::info!(status = response.status().as_u16(), duration_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}
