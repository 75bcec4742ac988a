//! Builder for constructing the order state manager from configuration.
//!
//! Storage backends are created through factory functions keyed by
//! implementation name, so the binary decides which backends exist while the
//! configuration decides which one is used.

use crate::event_bus::EventBus;
use crate::persistence::Persistence;
use crate::state::OrderStateManager;
use crate::summary::SummaryInputs;
use bill_config::Config;
use bill_storage::{StorageError, StorageInterface, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building the order state manager.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions needed to build the manager.
pub struct StateFactories<SF> {
	pub storage_factories: HashMap<String, SF>,
}

/// Builds an [`OrderStateManager`] with a pluggable storage backend.
pub struct StateBuilder {
	config: Config,
}

impl StateBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Creates the primary storage backend, then builds and loads the manager.
	pub async fn build<SF>(
		self,
		factories: StateFactories<SF>,
	) -> Result<OrderStateManager, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let primary = &self.config.storage.primary;
		let storage_config = self
			.config
			.storage
			.implementations
			.get(primary)
			.ok_or_else(|| {
				BuilderError::Config(format!(
					"Primary storage '{}' not found in implementations",
					primary
				))
			})?;
		let factory = factories.storage_factories.get(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!("storage implementation '{}'", primary))
		})?;

		let backend = match factory(storage_config) {
			Ok(backend) => {
				tracing::info!(component = "storage", implementation = %primary, "Loaded");
				backend
			},
			Err(e) => {
				tracing::error!(
					component = "storage",
					implementation = %primary,
					error = %e,
					"Failed to create storage implementation"
				);
				return Err(BuilderError::Config(format!(
					"Failed to create storage implementation '{}': {}",
					primary, e
				)));
			},
		};

		let storage = Arc::new(StorageService::new(backend));
		let summary = &self.config.summary;
		let mut manager = OrderStateManager::new(
			Persistence::new(storage),
			EventBus::new(crate::event_bus::DEFAULT_CAPACITY),
		)
		.with_proceed_delay(self.config.navigation.proceed_delay())
		.with_summary_inputs(SummaryInputs {
			surcharge: summary.default_surcharge,
			people_count: summary.default_people_count,
		});
		manager.load().await;

		tracing::info!(app_id = %self.config.app.id, "Order state ready");
		Ok(manager)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bill_storage::get_all_implementations;
	use bill_types::Page;
	use std::time::Duration;
	use tempfile::TempDir;

	fn all_factories(
	) -> StateFactories<fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>> {
		StateFactories {
			storage_factories: get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
		}
	}

	fn config(body: &str) -> Config {
		format!("[app]\nid = \"test\"\n{}", body).parse().unwrap()
	}

	#[tokio::test]
	async fn test_build_with_memory_storage() {
		let config = config(
			r#"
[storage]
primary = "memory"
[storage.implementations.memory]

[navigation]
proceed_delay_ms = 250

[summary]
default_surcharge = 6.0
default_people_count = 3
"#,
		);

		let manager = StateBuilder::new(config)
			.build(all_factories())
			.await
			.unwrap();
		assert_eq!(manager.page(), Page::Catalog);
		assert_eq!(
			manager.summary_inputs(),
			SummaryInputs {
				surcharge: 6.0,
				people_count: 3,
			}
		);
		assert_eq!(manager.summary().surcharge_per_person(), 2.0);
	}

	#[tokio::test]
	async fn test_build_loads_persisted_state() {
		let temp_dir = TempDir::new().unwrap();
		let config = config(&format!(
			"[storage]\nprimary = \"file\"\n[storage.implementations.file]\nstorage_path = \"{}\"\n[navigation]\nproceed_delay_ms = 0\n",
			temp_dir.path().display()
		));

		let mut first = StateBuilder::new(config.clone())
			.build(all_factories())
			.await
			.unwrap();
		first.add_food_item("Burger", "5").await.unwrap();
		drop(first);

		let second = StateBuilder::new(config)
			.build(all_factories())
			.await
			.unwrap();
		assert_eq!(second.catalog().len(), 1);
		assert_eq!(second.catalog()[0].name, "Burger");
	}

	#[tokio::test]
	async fn test_missing_factory() {
		let config = config("[storage]\nprimary = \"memory\"\n[storage.implementations.memory]\n");
		let factories = StateFactories {
			storage_factories: all_factories()
				.storage_factories
				.into_iter()
				.filter(|(name, _)| name != "memory")
				.collect(),
		};

		let result = StateBuilder::new(config).build(factories).await;
		assert!(matches!(result, Err(BuilderError::MissingComponent(_))));
	}

	#[tokio::test]
	async fn test_invalid_backend_config() {
		let config = config(
			"[storage]\nprimary = \"memory\"\n[storage.implementations.memory]\nunexpected = true\n",
		);

		let result = StateBuilder::new(config).build(all_factories()).await;
		assert!(matches!(result, Err(BuilderError::Config(msg)) if msg.contains("memory")));
	}

	#[tokio::test(start_paused = true)]
	async fn test_proceed_delay_from_config() {
		let config = config(
			"[storage]\nprimary = \"memory\"\n[storage.implementations.memory]\n[navigation]\nproceed_delay_ms = 1500\n",
		);
		let mut manager = StateBuilder::new(config)
			.build(all_factories())
			.await
			.unwrap();

		let start = tokio::time::Instant::now();
		assert!(manager.proceed().await);
		assert!(start.elapsed() >= Duration::from_millis(1500));
	}
}
