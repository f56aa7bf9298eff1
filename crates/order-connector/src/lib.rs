//! External data connector module for the order sync service.
//!
//! A connector moves raw order payloads between this service and a remote
//! system: `fetch` pulls text from a URL, `send` pushes text to one. The
//! payload is opaque at this layer; decoding happens in the transcoder.
//!
//! Implementations are selected by name from the configuration. Tests
//! substitute their own `ConnectorInterface` doubles.

use async_trait::async_trait;
use order_types::{ConfigSchema, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

/// Errors that can occur while talking to an external system.
#[derive(Debug, Error)]
pub enum ConnectorError {
	/// The peer answered with a status outside of `[200, 300)`.
	#[error("HTTP request failed: {status} - {body}")]
	Http { status: u16, body: String },
	/// Transport failure: connection refused, reset, timed out.
	#[error("Network error: {0}")]
	Network(String),
	/// The target URL could not be used to build a request.
	#[error("Invalid URL: {0}")]
	InvalidUrl(String),
	/// Error that occurs when configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the capability set of an external data connector.
#[async_trait]
pub trait ConnectorInterface: Send + Sync {
	/// Returns the configuration schema for this connector implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Retrieves the raw body served at `url`.
	///
	/// Succeeds only for a 2xx status; any other status is reported as
	/// `ConnectorError::Http` carrying the status and body.
	async fn fetch(&self, url: &str) -> Result<String, ConnectorError>;

	/// Sends `body` to `url`.
	///
	/// Returns whether the peer answered with a 2xx status. Only transport
	/// failures are errors.
	async fn send(&self, url: &str, body: &str) -> Result<bool, ConnectorError>;
}

/// Type alias for connector factory functions.
pub type ConnectorFactory =
	fn(&toml::Value) -> Result<Box<dyn ConnectorInterface>, ConnectorError>;

/// Registry trait for connector implementations.
pub trait ConnectorRegistry: ImplementationRegistry<Factory = ConnectorFactory> {}

/// Get all registered connector implementations.
pub fn get_all_implementations() -> Vec<(&'static str, ConnectorFactory)> {
	use implementations::http;

	vec![(http::Registry::NAME, http::Registry::factory())]
}

/// Service wrapping the configured connector implementation.
pub struct ConnectorService {
	implementation: Box<dyn ConnectorInterface>,
}

impl ConnectorService {
	/// Creates a new ConnectorService around an implementation.
	pub fn new(implementation: Box<dyn ConnectorInterface>) -> Self {
		Self { implementation }
	}

	/// Fetches the raw payload at `url`.
	pub async fn fetch(&self, url: &str) -> Result<String, ConnectorError> {
		tracing::debug!(url = %url, "Fetching external payload");
		let body = self.implementation.fetch(url).await?;
		tracing::debug!(url = %url, bytes = body.len(), "Fetched external payload");
		Ok(body)
	}

	/// Sends a raw payload to `url`, returning whether the peer accepted it.
	pub async fn send(&self, url: &str, body: &str) -> Result<bool, ConnectorError> {
		tracing::debug!(url = %url, bytes = body.len(), "Sending payload");
		let accepted = self.implementation.send(url, body).await?;
		if !accepted {
			tracing::warn!(url = %url, "External system rejected payload");
		}
		Ok(accepted)
	}
}
