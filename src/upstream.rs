//! Frontend call to the topping suggestion service.
//!
//! The call never returns an error: network failures become
//! [`DependencyResponse::Unreachable`] so the page can always render.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::instrument;

use crate::config::{FrontendConfig, UNKNOWN_STATUS_PLACEHOLDER};

/// Outcome of calling an upstream endpoint.
#[derive(Debug, Clone)]
pub enum DependencyResponse {
    /// The upstream answered; `body` is present when it parsed as JSON.
    Received { status: u16, body: Option<Value> },
    /// No HTTP response (timeout, refused connection, DNS failure).
    Unreachable { reason: String },
}

impl DependencyResponse {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DependencyResponse::Received { status, .. } => Some(*status),
            DependencyResponse::Unreachable { .. } => None,
        }
    }

    /// Status as shown to users: the code, or a placeholder when unreachable.
    pub fn status_display(&self) -> StatusDisplay {
        StatusDisplay(self.status_code())
    }
}

pub struct StatusDisplay(Option<u16>);

impl fmt::Display for StatusDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "{}", code),
            None => f.write_str(UNKNOWN_STATUS_PLACEHOLDER),
        }
    }
}

/// Client for the topping suggestion service.
#[derive(Clone)]
pub struct ToppingSuggestionClient {
    client: Client,
    base_url: String,
    endpoint: String,
}

impl ToppingSuggestionClient {
    pub fn new(config: &FrontendConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.topping_combo_suggester_url.clone(),
            endpoint: config.topping_combo_endpoint(),
        })
    }

    /// Configured base URL, shown in error messages.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(name = "upstream::fetch_topping_combo", skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch_topping_combo(&self) -> DependencyResponse {
        let response = match self.client.get(&self.endpoint).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Topping suggestion service unreachable");
                return DependencyResponse::Unreachable {
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status().as_u16();
        // A body that fails to arrive or parse is left for the caller to report.
        let body = match response.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!(status, error = %e, "Upstream body is not JSON");
                None
            }
        };

        DependencyResponse::Received { status, body }
    }
}

/// What the index page shows for a suggestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionView {
    pub topping_combo: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl SuggestionView {
    pub fn from_response(response: &DependencyResponse, configured_url: &str) -> Self {
        if let DependencyResponse::Received {
            status: 200,
            body: Some(body),
        } = response
        {
            if let Some(description) = body.get("description").and_then(Value::as_str) {
                return Self {
                    topping_combo: Some(description.to_string()),
                    errors: None,
                };
            }
        }

        let mut message = format!(
            "Received status {} from topping-combo-suggestion service. \
             Configured to use topping-combo-suggestion service url {}.",
            response.status_display(),
            configured_url
        );
        if response.status_code() == Some(200) {
            message.push_str(" The response did not include a description.");
        }

        Self {
            topping_combo: None,
            errors: Some(vec![message]),
        }
    }
}
