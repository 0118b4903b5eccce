//! Configuration module for the batch invoker service.
//!
//! This module provides structures and utilities for managing the demo
//! service configuration. It supports loading configuration from TOML files
//! and validates it before deserialization so misconfigurations fail with a
//! precise field path instead of a serde error.

use invoker_types::{Field, FieldType, Schema};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the invoker service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration of the engine instance to run.
	pub invoker: InvokerConfig,
	/// Configuration of the demo signing key.
	pub signer: SignerConfig,
	/// Configuration of the deployment-record store.
	#[serde(default)]
	pub store: StoreConfig,
}

/// Configuration of the engine instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvokerConfig {
	/// Engine variant: `account_abstraction`, `transaction` or `batch`.
	pub variant: String,
	/// Chain identifier baked into the domain separator.
	pub chain_id: u64,
}

/// Configuration of the demo signing key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignerConfig {
	/// Hex-encoded private key of the principal the demo run signs for.
	pub private_key: String,
}

/// Configuration of the deployment-record store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
	/// Directory holding `record.json`.
	#[serde(default = "default_store_path")]
	pub path: String,
	/// Forces fresh instance setup even when a record exists.
	#[serde(default)]
	pub redeploy: bool,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			path: default_store_path(),
			redeploy: false,
		}
	}
}

fn default_store_path() -> String {
	"out".to_string()
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;
		Self::from_toml(&raw)
	}

	/// Parses and validates configuration from a TOML string.
	pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
		let value: toml::Value = toml::from_str(raw)?;

		schema()
			.validate(&value)
			.map_err(|err| ConfigError::Validation(err.to_string()))?;

		let config: Config = toml::from_str(raw)?;
		Ok(config)
	}
}

/// The validation schema for the whole configuration file.
fn schema() -> Schema {
	let invoker = Schema::new(
		vec![
			Field::new("variant", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some("account_abstraction" | "transaction" | "batch") => Ok(()),
					Some(other) => Err(format!("unknown variant '{}'", other)),
					None => Err("expected a string".to_string()),
				}
			}),
			Field::new(
				"chain_id",
				FieldType::Integer {
					min: Some(1),
					max: None,
				},
			),
		],
		vec![],
	);

	let signer = Schema::new(
		vec![Field::new("private_key", FieldType::String).with_validator(|value| {
			let key = value.as_str().unwrap_or_default();
			let digits = key.strip_prefix("0x").unwrap_or(key);
			if digits.len() == 64 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
				Ok(())
			} else {
				Err("expected a 32-byte hex private key".to_string())
			}
		})],
		vec![],
	);

	let store = Schema::new(
		vec![],
		vec![
			Field::new("path", FieldType::String),
			Field::new("redeploy", FieldType::Boolean),
		],
	);

	Schema::new(
		vec![
			Field::new("invoker", FieldType::Table(invoker)),
			Field::new("signer", FieldType::Table(signer)),
		],
		vec![Field::new("store", FieldType::Table(store))],
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	const VALID: &str = r#"
[invoker]
variant = "batch"
chain_id = 4056

[signer]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"

[store]
path = "out"
redeploy = false
"#;

	#[test]
	fn test_parses_valid_config() {
		let config = Config::from_toml(VALID).unwrap();

		assert_eq!(config.invoker.variant, "batch");
		assert_eq!(config.invoker.chain_id, 4056);
		assert_eq!(config.store.path, "out");
		assert!(!config.store.redeploy);
	}

	#[test]
	fn test_store_section_is_optional() {
		let raw = VALID.replace("[store]\npath = \"out\"\nredeploy = false\n", "");
		let config = Config::from_toml(&raw).unwrap();

		assert_eq!(config.store.path, "out");
	}

	#[test]
	fn test_rejects_unknown_variant() {
		let raw = VALID.replace("\"batch\"", "\"sponsored\"");
		let result = Config::from_toml(&raw);

		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_rejects_malformed_private_key() {
		let raw = VALID.replace(
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
			"0x1234",
		);
		let result = Config::from_toml(&raw);

		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_rejects_missing_section() {
		let result = Config::from_toml("[invoker]\nvariant = \"batch\"\nchain_id = 1\n");

		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}
}
