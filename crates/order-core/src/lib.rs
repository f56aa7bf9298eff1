//! Core sync engine for the order sync service.
//!
//! This module coordinates the store, the external connector and the
//! transcoder to move orders between this service and a remote system. It
//! also provides the builder used to assemble an engine from configuration.

use order_config::Config;
use order_connector::{ConnectorError, ConnectorService};
use order_storage::{StorageError, StorageService};
use order_types::Order;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

pub mod builder;
pub mod transform;

pub use builder::{BuilderError, SyncBuilder, SyncFactories};
pub use transform::{TransformError, TransformService};

/// Errors that can occur during a sync operation.
///
/// The display text is the coarse category only; the underlying failure is
/// kept as the error source.
#[derive(Debug, Error)]
pub enum SyncError {
	/// The external system could not be reached or answered with an error.
	#[error("connection failed")]
	Connection(#[source] ConnectorError),
	/// The payload could not be converted to or from orders.
	#[error("transform failed")]
	Transform(#[source] TransformError),
	/// Any other failure, such as the store rejecting an order.
	#[error("sync failed")]
	Internal(#[source] StorageError),
}

impl From<ConnectorError> for SyncError {
	fn from(err: ConnectorError) -> Self {
		SyncError::Connection(err)
	}
}

impl From<TransformError> for SyncError {
	fn from(err: TransformError) -> Self {
		SyncError::Transform(err)
	}
}

impl From<StorageError> for SyncError {
	fn from(err: StorageError) -> Self {
		SyncError::Internal(err)
	}
}

/// Engine that synchronizes the local order store with external systems.
///
/// Every operation is a single attempt: no retries, and the network call
/// always completes before the store is touched.
pub struct OrderSyncEngine {
	/// Service configuration.
	config: Config,
	/// Local order store.
	storage: Arc<StorageService>,
	/// Connector to the external system.
	connector: Arc<ConnectorService>,
	/// Order transcoder.
	transform: TransformService,
}

impl OrderSyncEngine {
	/// Creates a new engine from its services.
	pub fn new(
		config: Config,
		storage: Arc<StorageService>,
		connector: Arc<ConnectorService>,
	) -> Self {
		Self {
			config,
			storage,
			connector,
			transform: TransformService::new(),
		}
	}

	/// Pulls orders served at `url` into the store.
	///
	/// A payload whose first non-whitespace character is `[` is decoded as a
	/// list and saved item by item in payload order; anything else is decoded
	/// as one order. The first failing save aborts the call, leaving earlier
	/// items of the same payload stored. Returns the number of orders saved.
	#[instrument(skip(self))]
	pub async fn pull_all(&self, url: &str) -> Result<usize, SyncError> {
		let result = self.pull_all_inner(url).await;
		match &result {
			Ok(count) => tracing::info!(url = %url, count, "Pulled orders"),
			Err(e) => tracing::error!(url = %url, error = %e, cause = %source_of(e), "Pull failed"),
		}
		result
	}

	async fn pull_all_inner(&self, url: &str) -> Result<usize, SyncError> {
		let payload = self.connector.fetch(url).await?;

		let orders = if self.transform.is_array_payload(&payload) {
			self.transform.decode_many(&payload)?
		} else {
			vec![self.transform.decode_one(&payload)?]
		};

		let mut saved = 0;
		for order in orders {
			self.storage.save(order).await?;
			saved += 1;
		}
		Ok(saved)
	}

	/// Pushes every stored order to `url` as one JSON array.
	///
	/// Returns `Ok(false)` without contacting the external system when the
	/// store is empty. Otherwise returns whether the peer accepted the payload.
	#[instrument(skip(self))]
	pub async fn push_all(&self, url: &str) -> Result<bool, SyncError> {
		let result = self.push_all_inner(url).await;
		match &result {
			Ok(true) => tracing::info!(url = %url, "Pushed orders"),
			Ok(false) => tracing::warn!(url = %url, "Push not accepted"),
			Err(e) => tracing::error!(url = %url, error = %e, cause = %source_of(e), "Push failed"),
		}
		result
	}

	async fn push_all_inner(&self, url: &str) -> Result<bool, SyncError> {
		let orders = self.storage.find_all().await?;
		if orders.is_empty() {
			tracing::warn!("No orders to push");
			return Ok(false);
		}

		let payload = self.transform.encode_many(&orders)?;
		tracing::debug!(count = orders.len(), bytes = payload.len(), "Encoded orders");
		Ok(self.connector.send(url, &payload).await?)
	}

	/// Pulls exactly one order from `url` and saves it.
	///
	/// The payload is always decoded as a single object, so an array payload
	/// fails as a transform error.
	#[instrument(skip(self))]
	pub async fn pull_one(&self, url: &str) -> Result<Order, SyncError> {
		let result = self.pull_one_inner(url).await;
		match &result {
			Ok(order) => tracing::info!(url = %url, order_id = %order.order_id, "Pulled order"),
			Err(e) => tracing::error!(url = %url, error = %e, cause = %source_of(e), "Pull failed"),
		}
		result
	}

	async fn pull_one_inner(&self, url: &str) -> Result<Order, SyncError> {
		let payload = self.connector.fetch(url).await?;
		let order = self.transform.decode_one(&payload)?;
		self.storage.save(order.clone()).await?;
		Ok(order)
	}

	/// Returns the order store.
	pub fn storage(&self) -> &Arc<StorageService> {
		&self.storage
	}

	/// Returns the service configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}
}

fn source_of(err: &SyncError) -> String {
	match err {
		SyncError::Connection(e) => e.to_string(),
		SyncError::Transform(e) => e.to_string(),
		SyncError::Internal(e) => e.to_string(),
	}
}
