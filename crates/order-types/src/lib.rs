//! Common types for the order sync service.
//!
//! Shared domain, API and configuration-validation types used by every
//! crate of the workspace.

/// API envelope and error types for the HTTP surface.
pub mod api;
/// The order record and its status.
pub mod order;
/// Registry trait for pluggable implementations.
pub mod registry;
/// Configuration validation types.
pub mod validation;

pub use api::*;
pub use order::{Order, OrderStatus, ORDER_DATE_FORMAT};
pub use registry::ImplementationRegistry;
pub use validation::*;
