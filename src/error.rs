//! Handler error types and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::middleware::RequestId;
use crate::toppings::ToppingError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Toppings(#[from] ToppingError),

    #[error("Not found")]
    NotFound,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Toppings(ToppingError::InsufficientToppings { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        AppErrorResponse {
            error: self,
            request_id: None,
        }
        .into_response()
    }
}

/// An [`AppError`] tagged with the request it occurred in.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: Option<RequestId>,
}

impl From<AppError> for AppErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        let (status, message) = self.error.status_and_message();
        let request_id = self
            .request_id
            .map(|id| id.0.to_string())
            .unwrap_or_default();

        if status.is_server_error() {
            tracing::error!(request_id = %request_id, error = ?self.error, "Request failed");
        }

        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {}</title>
</head>
<body>
    <section class="section">
        <h1 class="title">Error {}</h1>
        <p>{}</p>
        <p class="is-size-7">Request ID: {}</p>
        <a href="/">Return to homepage</a>
    </section>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
            message,
            request_id
        );

        (status, Html(body)).into_response()
    }
}

/// The same failure rendered for JSON endpoints.
pub struct JsonErrorResponse(pub AppErrorResponse);

impl From<AppErrorResponse> for JsonErrorResponse {
    fn from(error: AppErrorResponse) -> Self {
        Self(error)
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        let (status, message) = self.0.error.status_and_message();
        let request_id = self.0.request_id.map(|id| id.0.to_string());

        if status.is_server_error() {
            tracing::error!(request_id = ?request_id, error = ?self.0.error, "Request failed");
        }

        let body = serde_json::json!({
            "error": message,
            "request_id": request_id,
        });
        (status, Json(body)).into_response()
    }
}

/// Attach the current request ID to an error result.
pub trait ResultExt<T> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            request_id: Some(request_id.clone()),
        })
    }
}
