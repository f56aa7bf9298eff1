//! In-memory order store.
//!
//! Orders live in a `HashMap` keyed by order id behind a read-write lock.
//! Nothing survives a restart; `clear` is the only reset.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use order_types::{ConfigSchema, ImplementationRegistry, Order, Schema, ValidationError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage implementation.
pub struct MemoryStorage {
	/// Orders keyed by id, protected by a read-write lock.
	store: Arc<RwLock<HashMap<String, Order>>>,
}

impl MemoryStorage {
	/// Creates a new, empty MemoryStorage instance.
	pub fn new() -> Self {
		Self {
			store: Arc::new(RwLock::new(HashMap::new())),
		}
	}
}

impl Default for MemoryStorage {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn save(&self, order: Order) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		store.insert(order.order_id.clone(), order);
		Ok(())
	}

	async fn find_by_id(&self, id: &str) -> Result<Order, StorageError> {
		let store = self.store.read().await;
		store
			.get(id)
			.cloned()
			.ok_or_else(|| StorageError::NotFound(id.to_string()))
	}

	async fn find_all(&self) -> Result<Vec<Order>, StorageError> {
		let store = self.store.read().await;
		Ok(store.values().cloned().collect())
	}

	async fn delete(&self, id: &str) -> Result<bool, StorageError> {
		let mut store = self.store.write().await;
		Ok(store.remove(id).is_some())
	}

	async fn count(&self) -> Result<usize, StorageError> {
		let store = self.store.read().await;
		Ok(store.len())
	}

	async fn clear(&self) -> Result<usize, StorageError> {
		let mut store = self.store.write().await;
		let removed = store.len();
		store.clear();
		Ok(removed)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStorageSchema)
	}
}

/// Configuration schema for MemoryStorage.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// No fields, but the section must still be a table
		Schema::new(vec![]).validate(config)
	}
}

/// Factory function to create a memory storage backend from configuration.
///
/// Configuration parameters:
/// - None required for memory storage
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	MemoryStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;
	Ok(Box::new(MemoryStorage::new()))
}

/// Registry for the memory storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}
