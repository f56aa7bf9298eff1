//! Conversion between orders and their JSON text form.
//!
//! The encoded form is the wire contract shared with external systems:
//! `orderId, customerName, orderDate, status` in that order, dates as
//! `yyyy-MM-ddTHH:mm:ss` and statuses as their upper-case names.

use order_types::Order;
use thiserror::Error;

/// Errors that can occur while converting orders to or from JSON.
#[derive(Debug, Error)]
pub enum TransformError {
	/// The payload was empty or only whitespace.
	#[error("JSON payload is empty")]
	EmptyPayload,
	/// The payload is not a valid order (or list of orders).
	#[error("Failed to decode orders: {0}")]
	Decode(String),
	/// An order could not be serialized.
	#[error("Failed to encode orders: {0}")]
	Encode(String),
}

/// Stateless order transcoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformService;

impl TransformService {
	pub fn new() -> Self {
		Self
	}

	/// Decodes a single order object.
	pub fn decode_one(&self, text: &str) -> Result<Order, TransformError> {
		ensure_not_blank(text)?;
		Order::from_json(text).map_err(|e| TransformError::Decode(e.to_string()))
	}

	/// Encodes a single order.
	pub fn encode_one(&self, order: &Order) -> Result<String, TransformError> {
		order.to_json().map_err(|e| TransformError::Encode(e.to_string()))
	}

	/// Decodes a JSON array of orders, preserving payload order.
	pub fn decode_many(&self, text: &str) -> Result<Vec<Order>, TransformError> {
		ensure_not_blank(text)?;
		serde_json::from_str(text).map_err(|e| TransformError::Decode(e.to_string()))
	}

	/// Encodes a list of orders as a JSON array. An empty list encodes to `[]`.
	pub fn encode_many(&self, orders: &[Order]) -> Result<String, TransformError> {
		serde_json::to_string(orders).map_err(|e| TransformError::Encode(e.to_string()))
	}

	/// Returns true when the payload should be decoded as a list.
	///
	/// The rule is a sniff of the first non-whitespace character: `[` means a
	/// list, anything else a single object. A malformed payload starting with
	/// `[` is therefore routed to list decoding and fails there; it is never
	/// retried as a single object.
	pub fn is_array_payload(&self, text: &str) -> bool {
		text.trim_start().starts_with('[')
	}
}

fn ensure_not_blank(text: &str) -> Result<(), TransformError> {
	if text.trim().is_empty() {
		return Err(TransformError::EmptyPayload);
	}
	Ok(())
}
