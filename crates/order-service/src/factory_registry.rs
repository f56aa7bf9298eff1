//! Factory registry for the pluggable components.
//!
//! Collects every storage and connector implementation the crates register
//! and builds the sync engine from whichever ones the configuration names.

use order_config::Config;
use order_connector::{ConnectorError, ConnectorInterface};
use order_core::{OrderSyncEngine, SyncBuilder, SyncFactories};
use order_storage::{StorageError, StorageInterface};
use std::collections::HashMap;
use std::sync::OnceLock;

pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;
pub type ConnectorFactory =
	fn(&toml::Value) -> Result<Box<dyn ConnectorInterface>, ConnectorError>;

/// Registry of all implementation factories, keyed by name.
pub struct FactoryRegistry {
	pub storage: HashMap<String, StorageFactory>,
	pub connector: HashMap<String, ConnectorFactory>,
}

impl FactoryRegistry {
	/// Create a new empty registry
	pub fn new() -> Self {
		Self {
			storage: HashMap::new(),
			connector: HashMap::new(),
		}
	}

	pub fn register_storage(&mut self, name: impl Into<String>, factory: StorageFactory) {
		self.storage.insert(name.into(), factory);
	}

	pub fn register_connector(&mut self, name: impl Into<String>, factory: ConnectorFactory) {
		self.connector.insert(name.into(), factory);
	}
}

impl Default for FactoryRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Returns the global registry, populating it on first use.
pub fn get_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in order_storage::get_all_implementations() {
			tracing::debug!("Registering storage implementation: {}", name);
			registry.register_storage(name, factory);
		}

		for (name, factory) in order_connector::get_all_implementations() {
			tracing::debug!("Registering connector implementation: {}", name);
			registry.register_connector(name, factory);
		}

		registry
	})
}

/// Picks the factory for every configured implementation, rejecting unknown names.
fn select_factories<F: Copy>(
	available: &HashMap<String, F>,
	configured: &HashMap<String, toml::Value>,
	kind: &str,
) -> Result<HashMap<String, F>, String> {
	let mut factories = HashMap::new();
	for name in configured.keys() {
		match available.get(name) {
			Some(factory) => {
				factories.insert(name.clone(), *factory);
			},
			None => {
				let mut names: Vec<_> = available.keys().cloned().collect();
				names.sort();
				return Err(format!(
					"Unknown {} implementation '{}'. Available: [{}]",
					kind,
					name,
					names.join(", ")
				));
			},
		}
	}
	Ok(factories)
}

/// Builds the sync engine from the registry and the configuration.
pub fn build_engine_from_config(
	config: Config,
) -> Result<OrderSyncEngine, Box<dyn std::error::Error>> {
	let registry = get_registry();

	let storage_factories =
		select_factories(&registry.storage, &config.storage.implementations, "storage")?;
	let connector_factories = select_factories(
		&registry.connector,
		&config.connector.implementations,
		"connector",
	)?;

	let factories = SyncFactories {
		storage_factories,
		connector_factories,
	};

	Ok(SyncBuilder::new(config).build(factories)?)
}
