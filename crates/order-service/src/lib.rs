//! HTTP surface of the order sync service.
//!
//! Exposes the router and the engine factory so the binary and the
//! integration tests share the exact same wiring.

pub mod apis;
pub mod factory_registry;
pub mod server;

pub use factory_registry::build_engine_from_config;
pub use server::{router, start_server, AppState};
