//! HTTP server for the order sync API.
//!
//! All routes live under `/api/orders`. Handlers are in `apis::order`.

use crate::apis::order;
use axum::{
	extract::DefaultBodyLimit,
	routing::{delete, get, post},
	Router,
};
use order_config::ApiConfig;
use order_core::OrderSyncEngine;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Sync engine, also the owner of the order store.
	pub engine: Arc<OrderSyncEngine>,
}

/// Builds the API router with its middleware stack.
pub fn router(engine: Arc<OrderSyncEngine>, api_config: &ApiConfig) -> Router {
	let app_state = AppState { engine };

	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/orders", get(order::list_orders))
				.route("/orders/count", get(order::count_orders))
				.route("/orders/clear", delete(order::clear_orders))
				.route("/orders/sync-from", post(order::sync_from))
				.route("/orders/sync-to", post(order::sync_to))
				.route("/orders/sync-single", post(order::sync_single))
				.route(
					"/orders/{id}",
					get(order::get_order).delete(order::delete_order),
				),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive())
				.layer(DefaultBodyLimit::max(api_config.max_request_size)),
		)
		.with_state(app_state)
}

/// Starts the HTTP server and serves until the process is stopped.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<OrderSyncEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(engine, &api_config);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Order sync API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}
