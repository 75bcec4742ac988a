//! Configuration module for the bill counter.
//!
//! This module provides structures and utilities for managing application
//! configuration. It supports loading configuration from TOML files and
//! validates the result before it is used to build the order state manager.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

mod loader;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
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
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this application instance.
	pub app: AppConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for screen navigation.
	#[serde(default)]
	pub navigation: NavigationConfig,
	/// Initial values for the summary inputs.
	#[serde(default)]
	pub summary: SummaryConfig,
}

/// Identity of this application instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
	/// Identifier used in log output.
	pub id: String,
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for screen navigation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NavigationConfig {
	/// Cosmetic delay before the catalog screen hands over to order entry.
	/// Defaults to 1000 milliseconds.
	#[serde(default = "default_proceed_delay_ms")]
	pub proceed_delay_ms: u64,
}

impl NavigationConfig {
	pub fn proceed_delay(&self) -> Duration {
		Duration::from_millis(self.proceed_delay_ms)
	}
}

impl Default for NavigationConfig {
	fn default() -> Self {
		Self {
			proceed_delay_ms: default_proceed_delay_ms(),
		}
	}
}

/// Returns the default proceed delay in milliseconds.
fn default_proceed_delay_ms() -> u64 {
	1000
}

/// Initial values for the summary inputs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummaryConfig {
	/// Flat surcharge split across the headcount. Defaults to 0.
	#[serde(default)]
	pub default_surcharge: f64,
	/// Headcount the surcharge is divided by. Defaults to 1.
	#[serde(default = "default_people_count")]
	pub default_people_count: i64,
}

impl Default for SummaryConfig {
	fn default() -> Self {
		Self {
			default_surcharge: 0.0,
			default_people_count: default_people_count(),
		}
	}
}

fn default_people_count() -> i64 {
	1
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path.file_name().ok_or_else(|| {
			ConfigError::Validation(format!("Invalid path: {}", path.display()))
		})?;
		loader.load_config(file_name).await
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// - Ensures the app id is not empty
	/// - Validates the primary storage backend is configured
	/// - Bounds the proceed delay
	/// - Checks the summary defaults are usable numbers
	fn validate(&self) -> Result<(), ConfigError> {
		if self.app.id.trim().is_empty() {
			return Err(ConfigError::Validation("App ID cannot be empty".into()));
		}

		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		if self.navigation.proceed_delay_ms > 60_000 {
			return Err(ConfigError::Validation(
				"navigation.proceed_delay_ms cannot exceed 60000".into(),
			));
		}

		let surcharge = self.summary.default_surcharge;
		if !surcharge.is_finite() || surcharge < 0.0 {
			return Err(ConfigError::Validation(
				"summary.default_surcharge must be a non-negative number".into(),
			));
		}
		if self.summary.default_people_count < 1 {
			return Err(ConfigError::Validation(
				"summary.default_people_count must be at least 1".into(),
			));
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
