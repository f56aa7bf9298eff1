//! Plain HTTP/HTTPS connector.
//!
//! Uses a single pooled `reqwest::Client` with independent connect and
//! request timeouts. Both are bounded by configuration validation so a call
//! can never wait forever on a silent peer.
//!
//! ## Configuration
//!
//! - `connect_timeout_seconds` - TCP/TLS connect timeout (default: 10)
//! - `request_timeout_seconds` - whole request timeout (default: 30)

use crate::{ConnectorError, ConnectorFactory, ConnectorInterface, ConnectorRegistry};
use async_trait::async_trait;
use order_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;

const JSON: &str = "application/json";

/// Upper bound for both timeouts, in seconds.
const MAX_TIMEOUT_SECONDS: i64 = 300;

/// Configuration for the HTTP connector.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConnectorConfig {
	#[serde(default = "default_connect_timeout")]
	pub connect_timeout_seconds: u64,
	#[serde(default = "default_request_timeout")]
	pub request_timeout_seconds: u64,
}

fn default_connect_timeout() -> u64 {
	10
}

fn default_request_timeout() -> u64 {
	30
}

impl Default for HttpConnectorConfig {
	fn default() -> Self {
		Self {
			connect_timeout_seconds: default_connect_timeout(),
			request_timeout_seconds: default_request_timeout(),
		}
	}
}

/// Connector speaking plain HTTP to the external system.
pub struct HttpConnector {
	client: reqwest::Client,
}

impl HttpConnector {
	/// Builds the connector and its underlying client.
	pub fn new(config: &HttpConnectorConfig) -> Result<Self, ConnectorError> {
		let client = reqwest::Client::builder()
			.connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
			.timeout(Duration::from_secs(config.request_timeout_seconds))
			.build()
			.map_err(|e| ConnectorError::Configuration(format!("Failed to build HTTP client: {}", e)))?;
		Ok(Self { client })
	}
}

/// Maps a reqwest failure onto the connector taxonomy.
fn transport_error(url: &str, err: reqwest::Error) -> ConnectorError {
	if err.is_builder() {
		ConnectorError::InvalidUrl(format!("{}: {}", url, err))
	} else if err.is_timeout() {
		ConnectorError::Network(format!("timed out contacting {}: {}", url, err))
	} else {
		ConnectorError::Network(format!("{}: {}", url, err))
	}
}

#[async_trait]
impl ConnectorInterface for HttpConnector {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpConnectorSchema)
	}

	async fn fetch(&self, url: &str) -> Result<String, ConnectorError> {
		let response = self
			.client
			.get(url)
			.header(CONTENT_TYPE, JSON)
			.header(ACCEPT, JSON)
			.send()
			.await
			.map_err(|e| transport_error(url, e))?;

		let status = response.status();
		let body = response.text().await.map_err(|e| transport_error(url, e))?;

		if status.is_success() {
			Ok(body)
		} else {
			Err(ConnectorError::Http {
				status: status.as_u16(),
				body,
			})
		}
	}

	async fn send(&self, url: &str, body: &str) -> Result<bool, ConnectorError> {
		let response = self
			.client
			.post(url)
			.header(CONTENT_TYPE, JSON)
			.header(ACCEPT, JSON)
			.body(body.to_owned())
			.send()
			.await
			.map_err(|e| transport_error(url, e))?;

		let status = response.status();
		if !status.is_success() {
			tracing::debug!(url = %url, status = status.as_u16(), "Send answered with non-success status");
		}
		Ok(status.is_success())
	}
}

/// Configuration schema for HttpConnector.
pub struct HttpConnectorSchema;

impl ConfigSchema for HttpConnectorSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let timeout = || FieldType::Integer {
			min: Some(1),
			max: Some(MAX_TIMEOUT_SECONDS),
		};
		let schema = Schema::new(vec![
			Field::new("connect_timeout_seconds", timeout()),
			Field::new("request_timeout_seconds", timeout()),
		]);
		schema.validate(config)
	}
}

/// Factory function to create an HTTP connector from configuration.
pub fn create_connector(
	config: &toml::Value,
) -> Result<Box<dyn ConnectorInterface>, ConnectorError> {
	HttpConnectorSchema
		.validate(config)
		.map_err(|e| ConnectorError::Configuration(format!("Invalid http config: {}", e)))?;

	let http_config: HttpConnectorConfig = config
		.clone()
		.try_into()
		.map_err(|e| ConnectorError::Configuration(format!("Invalid http config: {}", e)))?;

	Ok(Box::new(HttpConnector::new(&http_config)?))
}

/// Registry for the HTTP connector implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = ConnectorFactory;

	fn factory() -> Self::Factory {
		create_connector
	}
}

impl ConnectorRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	fn table(src: &str) -> toml::Value {
		toml::from_str(src).unwrap()
	}

	#[test]
	fn test_defaults_when_empty() {
		let config: HttpConnectorConfig = table("").try_into().unwrap();
		assert_eq!(config.connect_timeout_seconds, 10);
		assert_eq!(config.request_timeout_seconds, 30);
		assert!(create_connector(&table("")).is_ok());
	}

	#[test]
	fn test_zero_timeout_rejected() {
		let result = create_connector(&table("request_timeout_seconds = 0"));
		assert!(matches!(result, Err(ConnectorError::Configuration(_))));
	}

	#[test]
	fn test_unbounded_timeout_rejected() {
		let result = create_connector(&table("connect_timeout_seconds = 100000"));
		assert!(matches!(result, Err(ConnectorError::Configuration(_))));
	}

	#[test]
	fn test_registry_name() {
		assert_eq!(Registry::NAME, "http");
	}
}
