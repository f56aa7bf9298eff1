//! In-process tests for the order API router.

use async_trait::async_trait;
use axum::{
	body::Body,
	http::{Request, StatusCode},
	Router,
};
use http_body_util::BodyExt;
use order_config::{ApiConfig, Config};
use order_connector::{ConnectorError, ConnectorInterface, ConnectorService};
use order_core::OrderSyncEngine;
use order_service::router;
use order_storage::{implementations::memory::MemoryStorage, StorageService};
use order_types::{ConfigSchema, Order, OrderStatus, Schema, ValidationError};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

const CONFIG: &str = r#"
[service]
id = "api-test"

[storage]
primary = "memory"
[storage.implementations.memory]

[connector]
primary = "http"
[connector.implementations.http]
"#;

const TWO_ORDERS: &str = r#"[
	{"orderId":"ORD-1","customerName":"Alice","orderDate":"2024-01-15T10:30:00","status":"PROCESSING"},
	{"orderId":"ORD-2","customerName":"Bob","orderDate":"2024-01-16T09:00:00","status":"SHIPPING"}
]"#;

const ONE_ORDER: &str =
	r#"{"orderId":"ORD-9","customerName":"Carol","orderDate":"2024-02-01T12:00:00","status":"COMPLETED"}"#;

struct NoSchema;

impl ConfigSchema for NoSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![]).validate(config)
	}
}

/// External system double: serves payloads per URL, accepts pushes to URLs
/// containing "accept", and refuses connections to anything else.
struct FakeExternalSystem {
	payloads: HashMap<String, String>,
}

#[async_trait]
impl ConnectorInterface for FakeExternalSystem {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(NoSchema)
	}

	async fn fetch(&self, url: &str) -> Result<String, ConnectorError> {
		self.payloads
			.get(url)
			.cloned()
			.ok_or_else(|| ConnectorError::Network(format!("{}: connection refused", url)))
	}

	async fn send(&self, url: &str, _body: &str) -> Result<bool, ConnectorError> {
		if url.contains("down") {
			return Err(ConnectorError::Network(format!("{}: connection refused", url)));
		}
		Ok(url.contains("accept"))
	}
}

fn test_app() -> (Router, Arc<OrderSyncEngine>) {
	let mut payloads = HashMap::new();
	payloads.insert("http://peer/orders".to_string(), TWO_ORDERS.to_string());
	payloads.insert("http://peer/order".to_string(), ONE_ORDER.to_string());
	payloads.insert("http://peer/garbage".to_string(), "[not json".to_string());

	let engine = Arc::new(OrderSyncEngine::new(
		Config::from_str(CONFIG).unwrap(),
		Arc::new(StorageService::new(Box::new(MemoryStorage::new()))),
		Arc::new(ConnectorService::new(Box::new(FakeExternalSystem { payloads }))),
	));
	(router(Arc::clone(&engine), &ApiConfig::default()), engine)
}

fn sample(id: &str) -> Order {
	let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
		.unwrap()
		.and_hms_opt(10, 30, 0)
		.unwrap();
	Order::new(id, "Alice", date, OrderStatus::Processing)
}

async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
	let request = Request::builder()
		.method(method)
		.uri(uri)
		.body(Body::empty())
		.unwrap();
	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
	(status, body)
}

#[tokio::test]
async fn list_orders_returns_envelope() {
	let (app, engine) = test_app();
	engine.storage().save(sample("ORD-1")).await.unwrap();

	let (status, body) = call(&app, "GET", "/api/orders").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], true);
	assert_eq!(body["data"].as_array().unwrap().len(), 1);
	assert_eq!(body["data"][0]["orderId"], "ORD-1");
	assert_eq!(body["data"][0]["orderDate"], "2024-01-15T10:30:00");
}

#[tokio::test]
async fn get_order_by_id() {
	let (app, engine) = test_app();
	engine.storage().save(sample("ORD-1")).await.unwrap();

	let (status, body) = call(&app, "GET", "/api/orders/ORD-1").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["customerName"], "Alice");
	assert_eq!(body["data"]["status"], "PROCESSING");
}

#[tokio::test]
async fn get_missing_order_is_404() {
	let (app, _) = test_app();

	let (status, body) = call(&app, "GET", "/api/orders/ORD-404").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["success"], false);
	assert!(body["message"].as_str().unwrap().contains("ORD-404"));
	assert!(body["data"].is_null());
}

#[tokio::test]
async fn delete_order() {
	let (app, engine) = test_app();
	engine.storage().save(sample("ORD-1")).await.unwrap();

	let (status, _) = call(&app, "DELETE", "/api/orders/ORD-1").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(engine.storage().count().await.unwrap(), 0);

	let (status, _) = call(&app, "DELETE", "/api/orders/ORD-1").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn count_and_clear() {
	let (app, engine) = test_app();
	engine.storage().save(sample("ORD-1")).await.unwrap();
	engine.storage().save(sample("ORD-2")).await.unwrap();

	let (status, body) = call(&app, "GET", "/api/orders/count").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"], 2);

	let (status, body) = call(&app, "DELETE", "/api/orders/clear").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body["message"].as_str().unwrap().contains('2'));
	assert!(body["data"].is_null());

	let (_, body) = call(&app, "GET", "/api/orders/count").await;
	assert_eq!(body["data"], 0);
}

#[tokio::test]
async fn sync_from_reports_new_orders() {
	let (app, engine) = test_app();
	engine.storage().save(sample("ORD-1")).await.unwrap();

	let (status, body) = call(
		&app,
		"POST",
		"/api/orders/sync-from?externalUrl=http://peer/orders",
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["externalUrl"], "http://peer/orders");
	assert_eq!(body["data"]["orderCount"], 1);
	assert_eq!(engine.storage().count().await.unwrap(), 2);

	let (_, body) = call(
		&app,
		"POST",
		"/api/orders/sync-from?externalUrl=http://peer/orders",
	)
	.await;
	assert_eq!(body["data"]["orderCount"], 0);
}

#[tokio::test]
async fn sync_from_requires_url() {
	let (app, _) = test_app();

	let (status, body) = call(&app, "POST", "/api/orders/sync-from").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["success"], false);

	let (status, _) = call(&app, "POST", "/api/orders/sync-from?externalUrl=%20%20").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sync_from_failures_are_400_without_details() {
	let (app, engine) = test_app();

	let (status, body) = call(
		&app,
		"POST",
		"/api/orders/sync-from?externalUrl=http://unknown/orders",
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "connection failed");

	let (status, body) = call(
		&app,
		"POST",
		"/api/orders/sync-from?externalUrl=http://peer/garbage",
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "transform failed");
	assert_eq!(engine.storage().count().await.unwrap(), 0);
}

#[tokio::test]
async fn sync_to_reports_total() {
	let (app, engine) = test_app();
	engine.storage().save(sample("ORD-1")).await.unwrap();
	engine.storage().save(sample("ORD-2")).await.unwrap();

	let (status, body) = call(
		&app,
		"POST",
		"/api/orders/sync-to?externalUrl=http://peer/accept",
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["orderCount"], 2);
}

#[tokio::test]
async fn sync_to_rejected_or_empty_is_400() {
	let (app, engine) = test_app();

	// Empty store
	let (status, _) = call(
		&app,
		"POST",
		"/api/orders/sync-to?externalUrl=http://peer/accept",
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	engine.storage().save(sample("ORD-1")).await.unwrap();
	let (status, _) = call(
		&app,
		"POST",
		"/api/orders/sync-to?externalUrl=http://peer/reject",
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, body) = call(
		&app,
		"POST",
		"/api/orders/sync-to?externalUrl=http://peer/down",
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "connection failed");
}

#[tokio::test]
async fn sync_single() {
	let (app, engine) = test_app();

	let (status, body) = call(
		&app,
		"POST",
		"/api/orders/sync-single?externalUrl=http://peer/order",
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["orderCount"], 1);
	assert!(engine.storage().find_by_id("ORD-9").await.is_ok());

	let (status, _) = call(
		&app,
		"POST",
		"/api/orders/sync-single?externalUrl=http://peer/orders",
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = call(&app, "POST", "/api/orders/sync-single").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}
