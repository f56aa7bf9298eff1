//! Storage module for the order sync service.
//!
//! This module provides the order store abstraction and its backends. The
//! only backend shipped is an in-memory map whose lifetime is the process
//! lifetime; there are no durability guarantees.

use async_trait::async_trait;
use order_types::{ConfigSchema, ImplementationRegistry, Order};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// The order or its id is not acceptable for storage.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	/// No order is stored under the requested id.
	#[error("Order not found: {0}")]
	NotFound(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for order store backends.
///
/// Every single-key operation must be atomic with respect to the others, and
/// `find_all`, `count` and `clear` must observe a consistent snapshot.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Inserts the order, replacing any order stored under the same id.
	async fn save(&self, order: Order) -> Result<(), StorageError>;

	/// Returns the order stored under `id`.
	async fn find_by_id(&self, id: &str) -> Result<Order, StorageError>;

	/// Returns a snapshot of all stored orders in unspecified order.
	async fn find_all(&self) -> Result<Vec<Order>, StorageError>;

	/// Removes the order stored under `id`, returning whether one was removed.
	async fn delete(&self, id: &str) -> Result<bool, StorageError>;

	/// Returns the number of stored orders.
	async fn count(&self) -> Result<usize, StorageError>;

	/// Removes every order, returning how many were removed.
	async fn clear(&self) -> Result<usize, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns (name, factory) tuples, used by the service to build its factory map.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::memory;

	vec![(memory::Registry::NAME, memory::Registry::factory())]
}

/// High-level order store used by the rest of the service.
///
/// Wraps a backend, rejects orders without a usable id before they reach it,
/// and traces every mutation.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	/// Stores an order, overwriting any order with the same id.
	///
	/// Fails with `InvalidArgument` when the id is empty or blank.
	pub async fn save(&self, order: Order) -> Result<(), StorageError> {
		if !order.has_valid_id() {
			return Err(StorageError::InvalidArgument(
				"order id must not be empty".to_string(),
			));
		}
		let order_id = order.order_id.clone();
		self.backend.save(order).await?;
		tracing::debug!(order_id = %order_id, "Saved order");
		Ok(())
	}

	/// Retrieves an order by id, failing with `NotFound` naming the id.
	pub async fn find_by_id(&self, id: &str) -> Result<Order, StorageError> {
		self.backend.find_by_id(id).await
	}

	/// Returns a snapshot of all orders.
	pub async fn find_all(&self) -> Result<Vec<Order>, StorageError> {
		self.backend.find_all().await
	}

	/// Deletes an order; missing ids are not an error.
	pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
		let removed = self.backend.delete(id).await?;
		if removed {
			tracing::debug!(order_id = %id, "Deleted order");
		}
		Ok(removed)
	}

	/// Returns the number of stored orders.
	pub async fn count(&self) -> Result<usize, StorageError> {
		self.backend.count().await
	}

	/// Removes all orders and returns how many were removed.
	pub async fn clear(&self) -> Result<usize, StorageError> {
		let removed = self.backend.clear().await?;
		tracing::info!(count = removed, "Cleared order store");
		Ok(removed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use implementations::memory::MemoryStorage;
	use order_types::OrderStatus;

	fn order(id: &str, customer: &str, status: OrderStatus) -> Order {
		let date = NaiveDate::from_ymd_opt(2024, 3, 1)
			.unwrap()
			.and_hms_opt(9, 0, 0)
			.unwrap();
		Order::new(id, customer, date, status)
	}

	fn service() -> StorageService {
		StorageService::new(Box::new(MemoryStorage::new()))
	}

	#[tokio::test]
	async fn test_save_rejects_empty_id() {
		let storage = service();

		let err = storage
			.save(order("", "Alice", OrderStatus::Processing))
			.await
			.unwrap_err();
		assert!(matches!(err, StorageError::InvalidArgument(_)));

		let err = storage
			.save(order("  ", "Alice", OrderStatus::Processing))
			.await
			.unwrap_err();
		assert!(matches!(err, StorageError::InvalidArgument(_)));

		assert_eq!(storage.count().await.unwrap(), 0);
	}

	#[tokio::test]
	async fn test_overwrite_keeps_count() {
		let storage = service();

		storage
			.save(order("ORD-1", "Alice", OrderStatus::Processing))
			.await
			.unwrap();
		assert_eq!(storage.count().await.unwrap(), 1);

		storage
			.save(order("ORD-1", "Bob", OrderStatus::Completed))
			.await
			.unwrap();
		assert_eq!(storage.count().await.unwrap(), 1);

		let stored = storage.find_by_id("ORD-1").await.unwrap();
		assert_eq!(stored.customer_name, "Bob");
		assert_eq!(stored.status, OrderStatus::Completed);
	}

	#[tokio::test]
	async fn test_not_found_names_id() {
		let storage = service();
		let err = storage.find_by_id("ORD-404").await.unwrap_err();
		assert!(matches!(&err, StorageError::NotFound(id) if id == "ORD-404"));
		assert!(err.to_string().contains("ORD-404"));
	}

	#[tokio::test]
	async fn test_delete_true_exactly_once() {
		let storage = service();
		assert!(!storage.delete("ORD-1").await.unwrap());

		storage
			.save(order("ORD-1", "Alice", OrderStatus::Shipping))
			.await
			.unwrap();
		assert!(storage.delete("ORD-1").await.unwrap());
		assert!(!storage.delete("ORD-1").await.unwrap());
		assert_eq!(storage.count().await.unwrap(), 0);
	}

	#[tokio::test]
	async fn test_clear_reports_removed() {
		let storage = service();
		for id in ["A", "B", "C"] {
			storage
				.save(order(id, "Alice", OrderStatus::Processing))
				.await
				.unwrap();
		}
		assert_eq!(storage.clear().await.unwrap(), 3);
		assert_eq!(storage.count().await.unwrap(), 0);
		assert!(storage.find_all().await.unwrap().is_empty());
	}

	#[test]
	fn test_registered_implementations() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["memory"]);
	}
}
