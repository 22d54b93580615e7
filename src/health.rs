//! Health-check aggregation across dependent services.
//!
//! Each request to the aggregator probes every configured dependency's
//! `/health-check` endpoint once. Probes run concurrently and fail
//! independently; results are reported in configuration order.

use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use tracing::instrument;

use crate::config::{join_url, HEALTH_CHECK_PATH};

/// A service whose health endpoint is probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub label: String,
    pub base_url: String,
}

impl Dependency {
    pub fn new(label: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            base_url: base_url.into(),
        }
    }

    pub fn health_check_endpoint(&self) -> String {
        join_url(&self.base_url, HEALTH_CHECK_PATH)
    }
}

/// Display classification of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Danger,
}

/// Outcome of one probe. `status_code` is absent when no HTTP response arrived.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    pub label: String,
    pub endpoint: String,
    pub status_code: Option<u16>,
    pub healthy: bool,
    pub status: HealthStatus,
}

impl HealthCheckResult {
    fn new(dependency: &Dependency, endpoint: String, status_code: Option<u16>) -> Self {
        let healthy = status_code == Some(200);
        Self {
            label: dependency.label.clone(),
            endpoint,
            status_code,
            healthy,
            status: if healthy {
                HealthStatus::Ok
            } else {
                HealthStatus::Danger
            },
        }
    }
}

/// Probes a fixed set of dependencies on demand.
#[derive(Clone)]
pub struct HealthAggregator {
    client: Client,
    dependencies: Vec<Dependency>,
}

impl HealthAggregator {
    pub fn new(dependencies: Vec<Dependency>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            dependencies,
        })
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Probe every dependency and return one result each, in configured order.
    #[instrument(name = "health::aggregate", skip(self), fields(dependencies = self.dependencies.len()))]
    pub async fn aggregate(&self) -> Vec<HealthCheckResult> {
        join_all(self.dependencies.iter().map(|dep| self.probe(dep))).await
    }

    async fn probe(&self, dependency: &Dependency) -> HealthCheckResult {
        let endpoint = dependency.health_check_endpoint();

        let status_code = match self.client.get(&endpoint).send().await {
            Ok(response) => Some(response.status().as_u16()),
            Err(e) => {
                tracing::warn!(
                    label = %dependency.label,
                    endpoint = %endpoint,
                    error = %e,
                    "Health probe failed"
                );
                None
            }
        };

        let result = HealthCheckResult::new(dependency, endpoint, status_code);
        tracing::debug!(
            label = %result.label,
            status_code = ?result.status_code,
            healthy = result.healthy,
            "Health probe finished"
        );
        result
    }
}
