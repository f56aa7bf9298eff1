//! Order domain types for the sync service.
//!
//! This module defines the order record exchanged with external systems and
//! its status enumeration. The serde shape of these types is the wire format
//! consumed by peers, so field names, field order, the date pattern and the
//! enum spelling are all part of the contract.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Date pattern used for `orderDate` on the wire (`yyyy-MM-ddTHH:mm:ss`).
pub const ORDER_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A single customer order.
///
/// Identity is carried by `order_id` alone: two orders with the same id are
/// equal regardless of their other fields. Re-saving an order with an existing
/// id replaces the stored value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Order {
	/// Unique identifier, used as the storage key.
	pub order_id: String,
	/// Name of the customer who placed the order.
	pub customer_name: String,
	/// Local timestamp of the order, second precision, no offset.
	#[serde(with = "order_date_serde")]
	pub order_date: NaiveDateTime,
	/// Current fulfilment status.
	pub status: OrderStatus,
}

impl Order {
	/// Creates a new order.
	pub fn new(
		order_id: impl Into<String>,
		customer_name: impl Into<String>,
		order_date: NaiveDateTime,
		status: OrderStatus,
	) -> Self {
		Self {
			order_id: order_id.into(),
			customer_name: customer_name.into(),
			order_date,
			status,
		}
	}

	/// Returns true when the id is usable as a storage key.
	pub fn has_valid_id(&self) -> bool {
		!self.order_id.trim().is_empty()
	}

	/// Serializes this order to its wire JSON form.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	/// Parses an order from its wire JSON form.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

impl PartialEq for Order {
	fn eq(&self, other: &Self) -> bool {
		self.order_id == other.order_id
	}
}

impl Eq for Order {}

impl Hash for Order {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.order_id.hash(state);
	}
}

impl fmt::Display for Order {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Order {{ id: {}, customer: {}, date: {}, status: {} }}",
			self.order_id,
			self.customer_name,
			self.order_date.format(ORDER_DATE_FORMAT),
			self.status
		)
	}
}

/// Fulfilment status of an order.
///
/// Serialized as the upper-case variant name; matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	Processing,
	Shipping,
	Completed,
}

impl OrderStatus {
	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Processing => "PROCESSING",
			OrderStatus::Shipping => "SHIPPING",
			OrderStatus::Completed => "COMPLETED",
		}
	}

	/// Returns the human readable label of the status.
	pub fn label(&self) -> &'static str {
		match self {
			OrderStatus::Processing => "Processing",
			OrderStatus::Shipping => "Shipping",
			OrderStatus::Completed => "Completed",
		}
	}

	/// Returns an iterator over all status variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::Processing, Self::Shipping, Self::Completed].into_iter()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"PROCESSING" => Ok(Self::Processing),
			"SHIPPING" => Ok(Self::Shipping),
			"COMPLETED" => Ok(Self::Completed),
			other => Err(format!("unknown order status: {}", other)),
		}
	}
}

/// Serde module for the fixed `orderDate` pattern.
pub mod order_date_serde {
	use super::ORDER_DATE_FORMAT;
	use chrono::NaiveDateTime;
	use serde::{de::Error, Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(&value.format(ORDER_DATE_FORMAT))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		NaiveDateTime::parse_from_str(&s, ORDER_DATE_FORMAT).map_err(|e| {
			D::Error::custom(format!(
				"invalid orderDate '{}', expected yyyy-MM-ddTHH:mm:ss: {}",
				s, e
			))
		})
	}
}
