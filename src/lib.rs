//! Pizzeria: toy pizza microservices.
//!
//! Three small HTTP services built from one library:
//! - **topping-suggestion**: serves random three-topping combos
//! - **frontend**: renders a suggestion fetched from topping-suggestion
//! - **health-checker**: probes both services and renders their status

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod templates;
pub mod toppings;
pub mod upstream;
