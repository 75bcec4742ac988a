//! Storage-related types for the bill counter.

/// Storage keys for the persisted collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants. The string values are the
/// keys the collections have always been stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Key for the menu catalog
	FoodItems,
	/// Key for the order ledger
	Orders,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::FoodItems => "foodItems",
			StorageKey::Orders => "orders",
		}
	}
}
