//! HTTP server startup and graceful shutdown.
//!
//! The server includes:
//! - Plain HTTP listener (TLS is terminated by the surrounding platform)
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
pub use shutdown::shutdown_signal;
