//! Builder pattern for constructing sync engines.
//!
//! Composes an OrderSyncEngine from the storage and connector implementations
//! named in the configuration, using factory functions keyed by
//! implementation name.

use crate::OrderSyncEngine;
use order_config::Config;
use order_connector::{ConnectorError, ConnectorInterface, ConnectorService};
use order_storage::{StorageError, StorageInterface, StorageService};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during sync engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Container for the factory functions needed to build an OrderSyncEngine.
///
/// Each factory takes the implementation's TOML table and returns the
/// implementation.
pub struct SyncFactories<SF, CF> {
	pub storage_factories: HashMap<String, SF>,
	pub connector_factories: HashMap<String, CF>,
}

/// Builder for constructing an OrderSyncEngine with pluggable implementations.
pub struct SyncBuilder {
	config: Config,
}

impl SyncBuilder {
	/// Creates a new SyncBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the OrderSyncEngine using factories for each component type.
	pub fn build<SF, CF>(self, factories: SyncFactories<SF, CF>) -> Result<OrderSyncEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
		CF: Fn(&toml::Value) -> Result<Box<dyn ConnectorInterface>, ConnectorError>,
	{
		// Create storage implementations
		let mut storage_impls = create_implementations(
			"storage",
			&self.config.storage.primary,
			&self.config.storage.implementations,
			&factories.storage_factories,
			|implementation: &Box<dyn StorageInterface>, config: &toml::Value| {
				implementation.config_schema().validate(config)
			},
		)?;

		let primary_storage = &self.config.storage.primary;
		let storage_backend = storage_impls.remove(primary_storage).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"Primary storage '{}' failed to load or has no registered factory",
				primary_storage
			))
		})?;
		let storage = Arc::new(StorageService::new(storage_backend));

		// Create connector implementations
		let mut connector_impls = create_implementations(
			"connector",
			&self.config.connector.primary,
			&self.config.connector.implementations,
			&factories.connector_factories,
			|implementation: &Box<dyn ConnectorInterface>, config: &toml::Value| {
				implementation.config_schema().validate(config)
			},
		)?;

		let primary_connector = &self.config.connector.primary;
		let connector_impl = connector_impls.remove(primary_connector).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"Primary connector '{}' failed to load or has no registered factory",
				primary_connector
			))
		})?;
		let connector = Arc::new(ConnectorService::new(connector_impl));

		Ok(OrderSyncEngine::new(self.config, storage, connector))
	}
}

/// Instantiates every configured implementation that has a registered factory.
///
/// Configured names without a factory are skipped with a warning; a factory
/// or schema failure aborts the build.
fn create_implementations<T, E, F, V>(
	component: &str,
	primary: &str,
	configs: &HashMap<String, toml::Value>,
	factories: &HashMap<String, F>,
	validate: V,
) -> Result<HashMap<String, T>, BuilderError>
where
	E: Display,
	F: Fn(&toml::Value) -> Result<T, E>,
	V: Fn(&T, &toml::Value) -> Result<(), order_types::ValidationError>,
{
	let mut impls = HashMap::new();
	for (name, config) in configs {
		let Some(factory) = factories.get(name) else {
			tracing::warn!(component, implementation = %name, "No factory registered, skipping");
			continue;
		};

		let implementation = factory(config).map_err(|e| {
			tracing::error!(
				component,
				implementation = %name,
				error = %e,
				"Failed to create implementation"
			);
			BuilderError::Config(format!(
				"Failed to create {} implementation '{}': {}",
				component, name, e
			))
		})?;

		validate(&implementation, config).map_err(|e| {
			BuilderError::Config(format!(
				"Invalid configuration for {} implementation '{}': {}",
				component, name, e
			))
		})?;

		let is_primary = primary == name;
		tracing::info!(component, implementation = %name, enabled = %is_primary, "Loaded");
		impls.insert(name.clone(), implementation);
	}

	if impls.is_empty() {
		return Err(BuilderError::Config(format!(
			"No valid {} implementations available",
			component
		)));
	}

	Ok(impls)
}
