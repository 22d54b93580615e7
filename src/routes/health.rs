//! Liveness endpoint shared by every service.
//!
//! Answers `True` whenever the process can serve HTTP; it performs no
//! dependency checks of its own. The health checker probes this route.

/// Health check handler.
pub async fn health_check() -> &'static str {
    "True"
}
