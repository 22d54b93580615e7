//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;

use crate::config::{HttpServerConfig, ServiceKind};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    Address(String),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Listen address for a service.
pub fn listen_addr(config: &HttpServerConfig, service: ServiceKind) -> Result<SocketAddr, ServerError> {
    format!("{}:{}", config.host, config.port_for(service))
        .parse()
        .map_err(|e| ServerError::Address(format!("{}:{}: {}", config.host, config.port_for(service), e)))
}

/// Serve `app` until SIGTERM or Ctrl+C.
///
/// This function blocks until the server shuts down.
pub async fn start_server(
    app: Router,
    config: &HttpServerConfig,
    service: ServiceKind,
) -> Result<(), ServerError> {
    let addr = listen_addr(config, service)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, service = service.name(), "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    tracing::info!(service = service.name(), "Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_uses_service_default() {
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: None,
        };
        let addr = listen_addr(&config, ServiceKind::HealthChecker).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:5050");
    }

    #[test]
    fn test_listen_addr_rejects_bad_host() {
        let config = HttpServerConfig {
            host: "not a host".to_string(),
            port: Some(80),
        };
        assert!(matches!(
            listen_addr(&config, ServiceKind::Frontend),
            Err(ServerError::Address(_))
        ));
    }
}
