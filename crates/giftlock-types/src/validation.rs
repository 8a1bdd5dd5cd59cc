//! Configuration validation framework.
//!
//! Implementations receive their configuration as raw `toml::Value` tables;
//! each one publishes a [`Schema`] describing the fields it accepts so that
//! malformed configuration fails at startup with a precise message instead
//! of surfacing later as a runtime error.

use thiserror::Error;

/// Errors produced while validating an implementation's configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid type for field '{field}': expected {expected}")]
	InvalidType { field: String, expected: String },
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
}

/// Schema describing an implementation's configuration surface.
pub trait ConfigSchema: Send + Sync {
	/// Validates the raw configuration table.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

/// Expected type of a configuration field.
#[derive(Clone)]
pub enum FieldType {
	String,
	Boolean,
	Integer { min: Option<i64>, max: Option<i64> },
	Array(Box<FieldType>),
	Table(Schema),
}

impl FieldType {
	fn describe(&self) -> String {
		match self {
			FieldType::String => "string".to_string(),
			FieldType::Boolean => "boolean".to_string(),
			FieldType::Integer { .. } => "integer".to_string(),
			FieldType::Array(inner) => format!("array of {}", inner.describe()),
			FieldType::Table(_) => "table".to_string(),
		}
	}

	fn check(&self, field: &str, value: &toml::Value) -> Result<(), ValidationError> {
		match self {
			FieldType::String => {
				if !value.is_str() {
					return Err(self.type_error(field));
				}
			},
			FieldType::Boolean => {
				if !value.is_bool() {
					return Err(self.type_error(field));
				}
			},
			FieldType::Integer { min, max } => {
				let n = value.as_integer().ok_or_else(|| self.type_error(field))?;
				if let Some(min) = min {
					if n < *min {
						return Err(ValidationError::InvalidValue {
							field: field.to_string(),
							message: format!("{} is below the minimum {}", n, min),
						});
					}
				}
				if let Some(max) = max {
					if n > *max {
						return Err(ValidationError::InvalidValue {
							field: field.to_string(),
							message: format!("{} is above the maximum {}", n, max),
						});
					}
				}
			},
			FieldType::Array(inner) => {
				let items = value.as_array().ok_or_else(|| self.type_error(field))?;
				for item in items {
					inner.check(field, item)?;
				}
			},
			FieldType::Table(schema) => {
				if !value.is_table() {
					return Err(self.type_error(field));
				}
				schema.validate(value)?;
			},
		}
		Ok(())
	}

	fn type_error(&self, field: &str) -> ValidationError {
		ValidationError::InvalidType {
			field: field.to_string(),
			expected: self.describe(),
		}
	}
}

/// One configuration field with its expected type and optional extra check.
#[derive(Clone)]
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	validator: Option<fn(&toml::Value) -> Result<(), String>>,
}

impl Field {
	pub fn new(name: &str, field_type: FieldType) -> Self {
		Field {
			name: name.to_string(),
			field_type,
			validator: None,
		}
	}

	/// Attaches a custom value check run after the type check passes.
	pub fn with_validator(mut self, validator: fn(&toml::Value) -> Result<(), String>) -> Self {
		self.validator = Some(validator);
		self
	}

	fn validate(&self, value: &toml::Value) -> Result<(), ValidationError> {
		self.field_type.check(&self.name, value)?;
		if let Some(validator) = self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}
		Ok(())
	}
}

/// Required and optional fields of one configuration table.
#[derive(Clone, Default)]
pub struct Schema {
	required: Vec<Field>,
	optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Schema { required, optional }
	}

	/// Validates a raw configuration value against this schema.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::InvalidType {
				field: "<root>".to_string(),
				expected: "table".to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.validate(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.validate(value)?;
			}
		}

		Ok(())
	}
}
