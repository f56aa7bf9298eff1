//! Validation of implementation-specific TOML tables.
//!
//! Storage and connector implementations each receive a raw TOML table from
//! the configuration file. Before an implementation is constructed its table
//! is checked against a `Schema` describing the fields it understands.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// A field has a value outside of its allowed domain.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// A field has the wrong TOML type.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	/// Integer with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
}

/// A named, typed field in a schema.
#[derive(Debug)]
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
}

impl Field {
	/// Creates a new field with the given name and type.
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
		}
	}
}

/// Fields accepted by an implementation table.
///
/// Every field is optional: implementations fall back to defaults for
/// anything left out.
#[derive(Debug)]
pub struct Schema {
	pub fields: Vec<Field>,
}

impl Schema {
	/// Creates a new schema from its fields.
	pub fn new(fields: Vec<Field>) -> Self {
		Self { fields }
	}

	/// Validates a TOML value against this schema.
	///
	/// The value must be a table. Fields are only checked when present and
	/// unknown keys are ignored.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| type_mismatch("root", "table", config))?;

		for field in &self.fields {
			if let Some(value) = table.get(&field.name) {
				validate_field_type(&field.name, value, &field.field_type)?;
			}
		}

		Ok(())
	}
}

fn type_mismatch(field_name: &str, expected: &str, value: &toml::Value) -> ValidationError {
	ValidationError::TypeMismatch {
		field: field_name.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	}
}

fn validate_field_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	match expected_type {
		FieldType::Integer { min, max } => {
			let int_val = value
				.as_integer()
				.ok_or_else(|| type_mismatch(field_name, "integer", value))?;

			if let Some(min_val) = min {
				if int_val < *min_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("{} is below the minimum of {}", int_val, min_val),
					});
				}
			}

			if let Some(max_val) = max {
				if int_val > *max_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("{} is above the maximum of {}", int_val, max_val),
					});
				}
			}
		},
	}

	Ok(())
}

/// A configuration schema that can validate TOML values.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn timeout_schema() -> Schema {
		Schema::new(vec![Field::new(
			"timeout_seconds",
			FieldType::Integer {
				min: Some(1),
				max: Some(300),
			},
		)])
	}

	fn table(src: &str) -> toml::Value {
		toml::from_str(src).unwrap()
	}

	#[test]
	fn test_valid_table() {
		assert!(timeout_schema().validate(&table("timeout_seconds = 10")).is_ok());
	}

	#[test]
	fn test_absent_field_and_unknown_keys_accepted() {
		assert!(timeout_schema().validate(&table("")).is_ok());
		assert!(timeout_schema().validate(&table("colour = \"blue\"")).is_ok());
	}

	#[test]
	fn test_integer_bounds() {
		let err = timeout_schema().validate(&table("timeout_seconds = 0")).unwrap_err();
		assert!(matches!(err, ValidationError::InvalidValue { .. }));

		let err = timeout_schema().validate(&table("timeout_seconds = 301")).unwrap_err();
		assert!(matches!(err, ValidationError::InvalidValue { .. }));
	}

	#[test]
	fn test_type_mismatch() {
		let err = timeout_schema()
			.validate(&table("timeout_seconds = \"ten\""))
			.unwrap_err();
		assert!(matches!(err, ValidationError::TypeMismatch { .. }));
	}

	#[test]
	fn test_non_table_rejected() {
		let err = Schema::new(vec![])
			.validate(&toml::Value::Integer(3))
			.unwrap_err();
		assert!(matches!(err, ValidationError::TypeMismatch { field, .. } if field == "root"));
	}
}
