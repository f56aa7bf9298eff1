//! API types for the order sync HTTP API.
//!
//! Every endpoint answers with the same `{success, message, data}` envelope;
//! failures carry `data: null` and a human readable message.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response envelope shared by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
	/// Whether the request succeeded.
	pub success: bool,
	/// Human-readable description of the outcome.
	pub message: String,
	/// Payload, `None` on failure.
	pub data: Option<T>,
}

impl<T> ApiResponse<T> {
	/// Builds a successful response carrying `data`.
	pub fn success(message: impl Into<String>, data: T) -> Self {
		Self {
			success: true,
			message: message.into(),
			data: Some(data),
		}
	}

	/// Builds a successful response without a payload.
	pub fn success_empty(message: impl Into<String>) -> Self {
		Self {
			success: true,
			message: message.into(),
			data: None,
		}
	}

	/// Builds a failed response.
	pub fn failure(message: impl Into<String>) -> Self {
		Self {
			success: false,
			message: message.into(),
			data: None,
		}
	}
}

/// Outcome of a sync endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
	/// External endpoint that was contacted.
	pub external_url: String,
	/// Orders added by a pull, or orders sent by a push.
	pub order_count: usize,
}

/// Query parameters accepted by the sync endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncQuery {
	#[serde(rename = "externalUrl")]
	pub external_url: Option<String>,
}

impl SyncQuery {
	/// Returns the URL as given, or `None` when missing or blank.
	pub fn url(&self) -> Option<&str> {
		self.external_url
			.as_deref()
			.filter(|url| !url.trim().is_empty())
	}
}

/// Structured API error type with HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Bad request (400).
	BadRequest { message: String },
	/// Resource not found (404).
	NotFound { message: String },
	/// Internal server error (500). The message is sent to the client
	/// verbatim, so it must never contain internal details.
	InternalServerError { message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> StatusCode {
		match self {
			APIError::BadRequest { .. } => StatusCode::BAD_REQUEST,
			APIError::NotFound { .. } => StatusCode::NOT_FOUND,
			APIError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Returns the client-facing message.
	pub fn message(&self) -> &str {
		match self {
			APIError::BadRequest { message }
			| APIError::NotFound { message }
			| APIError::InternalServerError { message } => message,
		}
	}

	/// Generic 500 used when the cause must not be exposed.
	pub fn internal() -> Self {
		APIError::InternalServerError {
			message: "Internal server error".to_string(),
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message } => write!(f, "Not Found: {}", message),
			APIError::InternalServerError { message } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl IntoResponse for APIError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let body = ApiResponse::<()>::failure(self.message());
		(status, Json(body)).into_response()
	}
}
