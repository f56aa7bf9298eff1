//! Order API handlers.
//!
//! CRUD-style access to the local store plus the three sync endpoints. Every
//! handler answers with the `ApiResponse` envelope; failures go through
//! `APIError` so status codes are decided in one place.

use crate::server::AppState;
use axum::{
	extract::{Path, Query, State},
	response::Json,
};
use order_core::SyncError;
use order_storage::StorageError;
use order_types::{APIError, ApiResponse, Order, SyncQuery, SyncReport};
use tracing::{info, warn};

type ApiResult<T> = Result<Json<ApiResponse<T>>, APIError>;

/// Maps a store failure to its HTTP error.
///
/// Backend details are logged, never returned.
fn storage_error(err: StorageError) -> APIError {
	match err {
		StorageError::NotFound(id) => APIError::NotFound {
			message: format!("Order not found: {}", id),
		},
		StorageError::InvalidArgument(message) => APIError::BadRequest { message },
		other => {
			tracing::error!(error = %other, "Order store failure");
			APIError::internal()
		},
	}
}

/// Maps a sync failure to a 400 carrying only its category.
fn sync_error(err: SyncError) -> APIError {
	APIError::BadRequest {
		message: err.to_string(),
	}
}

fn required_url(query: &SyncQuery) -> Result<String, APIError> {
	query
		.url()
		.map(str::to_string)
		.ok_or_else(|| APIError::BadRequest {
			message: "externalUrl is required".to_string(),
		})
}

/// Handles GET /api/orders.
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Vec<Order>> {
	let orders = state.engine.storage().find_all().await.map_err(storage_error)?;
	Ok(Json(ApiResponse::success(
		format!("Found {} orders", orders.len()),
		orders,
	)))
}

/// Handles GET /api/orders/count.
pub async fn count_orders(State(state): State<AppState>) -> ApiResult<usize> {
	let count = state.engine.storage().count().await.map_err(storage_error)?;
	Ok(Json(ApiResponse::success("Order count", count)))
}

/// Handles DELETE /api/orders/clear.
pub async fn clear_orders(State(state): State<AppState>) -> ApiResult<()> {
	let removed = state.engine.storage().clear().await.map_err(storage_error)?;
	Ok(Json(ApiResponse::success_empty(format!(
		"Cleared {} orders",
		removed
	))))
}

/// Handles GET /api/orders/{id}.
pub async fn get_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> ApiResult<Order> {
	let order = state
		.engine
		.storage()
		.find_by_id(&id)
		.await
		.map_err(storage_error)?;
	Ok(Json(ApiResponse::success("Order found", order)))
}

/// Handles DELETE /api/orders/{id}.
pub async fn delete_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> ApiResult<()> {
	let removed = state
		.engine
		.storage()
		.delete(&id)
		.await
		.map_err(storage_error)?;
	if !removed {
		return Err(storage_error(StorageError::NotFound(id)));
	}
	info!(order_id = %id, "Deleted order");
	Ok(Json(ApiResponse::success_empty(format!("Deleted order {}", id))))
}

/// Handles POST /api/orders/sync-from.
///
/// Reports how much the store grew, so re-pulling orders that already exist
/// reports zero.
pub async fn sync_from(
	Query(query): Query<SyncQuery>,
	State(state): State<AppState>,
) -> ApiResult<SyncReport> {
	let url = required_url(&query)?;
	let storage = state.engine.storage();

	let before = storage.count().await.map_err(storage_error)?;
	state.engine.pull_all(&url).await.map_err(|e| {
		warn!(url = %url, error = %e, "Sync from external system failed");
		sync_error(e)
	})?;
	let after = storage.count().await.map_err(storage_error)?;

	let added = after.saturating_sub(before);
	Ok(Json(ApiResponse::success(
		format!("Synced {} new orders", added),
		SyncReport {
			external_url: url,
			order_count: added,
		},
	)))
}

/// Handles POST /api/orders/sync-to.
pub async fn sync_to(
	Query(query): Query<SyncQuery>,
	State(state): State<AppState>,
) -> ApiResult<SyncReport> {
	let url = required_url(&query)?;

	let accepted = state.engine.push_all(&url).await.map_err(|e| {
		warn!(url = %url, error = %e, "Sync to external system failed");
		sync_error(e)
	})?;
	if !accepted {
		return Err(APIError::BadRequest {
			message: "Sync to external system failed".to_string(),
		});
	}

	let total = state.engine.storage().count().await.map_err(storage_error)?;
	Ok(Json(ApiResponse::success(
		format!("Sent {} orders", total),
		SyncReport {
			external_url: url,
			order_count: total,
		},
	)))
}

/// Handles POST /api/orders/sync-single.
pub async fn sync_single(
	Query(query): Query<SyncQuery>,
	State(state): State<AppState>,
) -> ApiResult<SyncReport> {
	let url = required_url(&query)?;

	let order = state.engine.pull_one(&url).await.map_err(|e| {
		warn!(url = %url, error = %e, "Single order sync failed");
		sync_error(e)
	})?;

	Ok(Json(ApiResponse::success(
		format!("Synced order {}", order.order_id),
		SyncReport {
			external_url: url,
			order_count: 1,
		},
	)))
}
