//! Persistence adapter for the menu catalog and the order ledger.
//!
//! Loading never fails: an absent or unreadable key yields an empty
//! collection. Saving never fails either: errors are logged and dropped, so a
//! broken backend cannot interrupt a session.

use bill_storage::{StorageError, StorageService};
use bill_types::{FoodItem, Order, StorageKey};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Loads and saves the two persisted collections.
#[derive(Clone)]
pub struct Persistence {
	storage: Arc<StorageService>,
}

impl Persistence {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Reads the menu catalog, empty when absent or unreadable.
	pub async fn load_catalog(&self) -> Vec<FoodItem> {
		self.load_or_default(StorageKey::FoodItems).await
	}

	/// Reads the order ledger, empty when absent or unreadable.
	pub async fn load_ledger(&self) -> Vec<Order> {
		self.load_or_default(StorageKey::Orders).await
	}

	/// Writes the full catalog, replacing the stored value.
	pub async fn save_catalog(&self, catalog: &[FoodItem]) {
		self.save(StorageKey::FoodItems, catalog).await
	}

	/// Writes the full ledger, replacing the stored value.
	pub async fn save_ledger(&self, ledger: &[Order]) {
		self.save(StorageKey::Orders, ledger).await
	}

	async fn load_or_default<T>(&self, key: StorageKey) -> Vec<T>
	where
		T: DeserializeOwned,
	{
		match self.storage.retrieve::<Vec<T>>(key).await {
			Ok(values) => {
				tracing::debug!(key = key.as_str(), count = values.len(), "Loaded");
				values
			},
			Err(StorageError::NotFound) => {
				tracing::debug!(key = key.as_str(), "Nothing stored yet, starting empty");
				Vec::new()
			},
			Err(e) => {
				tracing::warn!(key = key.as_str(), error = %e, "Failed to load, starting empty");
				Vec::new()
			},
		}
	}

	async fn save<T>(&self, key: StorageKey, values: &[T])
	where
		T: Serialize,
	{
		if let Err(e) = self.storage.store(key, values).await {
			tracing::warn!(key = key.as_str(), error = %e, "Failed to persist");
		}
	}
}
