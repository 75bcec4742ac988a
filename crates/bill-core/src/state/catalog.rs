//! Catalog editor operations.

use super::OrderStateManager;
use bill_types::{
	parse_price_input, parse_quantity_input, truncate_id, CatalogEvent, FoodItem, OrderEvent,
	StateEvent,
};

impl OrderStateManager {
	/// Appends a new item to the menu catalog.
	///
	/// Does nothing when the trimmed name is empty or the price text is not a
	/// non-negative number; blank price text counts as 0. On success the
	/// pending inputs and the draft selection are cleared and the catalog is
	/// persisted.
	pub async fn add_food_item(&mut self, name: &str, price_text: &str) -> Option<FoodItem> {
		let name = name.trim();
		if name.is_empty() {
			tracing::debug!("Ignoring item with empty name");
			return None;
		}
		let Some(price) = parse_price_input(price_text) else {
			tracing::debug!(price = price_text, "Ignoring item with invalid price");
			return None;
		};

		let item = FoodItem::new(name, price);
		self.catalog.push(item.clone());
		self.new_item_name.clear();
		self.new_item_price.clear();
		self.draft.clear();

		tracing::info!(item_id = %truncate_id(&item.id), name = %item.name, price, "Added catalog item");

		self.persistence.save_catalog(&self.catalog).await;
		self.publish(StateEvent::Catalog(CatalogEvent::ItemAdded { item: item.clone() }));
		self.publish(StateEvent::Order(OrderEvent::DraftCleared));
		Some(item)
	}

	pub fn new_item_name(&self) -> &str {
		&self.new_item_name
	}

	pub fn new_item_price(&self) -> &str {
		&self.new_item_price
	}

	pub fn set_new_item_name(&mut self, name: impl Into<String>) {
		self.new_item_name = name.into();
		self.publish(StateEvent::Catalog(CatalogEvent::InputChanged));
	}

	pub fn set_new_item_price(&mut self, price: impl Into<String>) {
		self.new_item_price = price.into();
		self.publish(StateEvent::Catalog(CatalogEvent::InputChanged));
	}

	/// Adds an item from the pending name and price inputs.
	pub async fn submit_new_item(&mut self) -> Option<FoodItem> {
		let name = self.new_item_name.clone();
		let price = self.new_item_price.clone();
		self.add_food_item(&name, &price).await
	}

	/// Sets the drafted quantity for an item, clamping negatives to zero.
	pub fn set_draft_quantity(&mut self, item_id: &str, quantity: i64) -> u32 {
		let quantity = self.draft.set(item_id, quantity);
		self.publish(StateEvent::Order(OrderEvent::DraftUpdated {
			item_id: item_id.to_string(),
			quantity,
		}));
		quantity
	}

	/// Sets the drafted quantity from raw text; unparsable text counts as zero.
	pub fn set_draft_quantity_text(&mut self, item_id: &str, text: &str) -> u32 {
		self.set_draft_quantity(item_id, parse_quantity_input(text))
	}

	pub fn draft_quantity(&self, item_id: &str) -> u32 {
		self.draft.get(item_id)
	}
}

#[cfg(test)]
mod tests {
	use super::super::test_support::*;
	use std::collections::HashSet;

	#[tokio::test]
	async fn test_valid_items_grow_catalog_with_unique_ids() {
		let mut manager = manager();
		for (name, price) in [("Burger", "5"), ("Fries", "2.5"), ("Burger", "5")] {
			let before = manager.catalog().len();
			assert!(manager.add_food_item(name, price).await.is_some());
			assert_eq!(manager.catalog().len(), before + 1);
		}

		let ids: HashSet<_> = manager.catalog().iter().map(|item| &item.id).collect();
		assert_eq!(ids.len(), 3);
		assert_eq!(manager.catalog()[1].price, 2.5);
	}

	#[tokio::test]
	async fn test_invalid_items_ignored() {
		let mut manager = manager();
		assert!(manager.add_food_item("", "5").await.is_none());
		assert!(manager.add_food_item("   ", "5").await.is_none());
		assert!(manager.add_food_item("Soda", "abc").await.is_none());
		assert!(manager.add_food_item("Soda", "-1").await.is_none());
		assert!(manager.catalog().is_empty());
	}

	#[tokio::test]
	async fn test_blank_price_is_free() {
		let mut manager = manager();
		let item = manager.add_food_item("Water", "").await.unwrap();
		assert_eq!(item.price, 0.0);

		manager.add_food_item("Tap water", "  ").await.unwrap();
		assert_eq!(manager.catalog().len(), 2);
		assert_eq!(manager.catalog()[1].price, 0.0);
	}

	#[tokio::test]
	async fn test_name_is_trimmed() {
		let mut manager = manager();
		let item = manager.add_food_item("  Soda ", " 1.5 ").await.unwrap();
		assert_eq!(item.name, "Soda");
		assert_eq!(item.price, 1.5);
	}

	#[tokio::test]
	async fn test_submit_clears_inputs_and_draft() {
		let mut manager = manager();
		manager.set_draft_quantity("stale", 3);
		manager.set_new_item_name("Soda");
		manager.set_new_item_price("1.5");

		let item = manager.submit_new_item().await.unwrap();
		assert_eq!(item.name, "Soda");
		assert_eq!(manager.new_item_name(), "");
		assert_eq!(manager.new_item_price(), "");
		assert!(manager.draft().is_empty());
	}

	#[tokio::test]
	async fn test_failed_submit_keeps_inputs() {
		let mut manager = manager();
		manager.set_new_item_name("Soda");
		manager.set_new_item_price("free");

		assert!(manager.submit_new_item().await.is_none());
		assert_eq!(manager.new_item_name(), "Soda");
		assert_eq!(manager.new_item_price(), "free");
	}

	#[tokio::test]
	async fn test_draft_quantities() {
		let mut manager = manager();
		assert_eq!(manager.set_draft_quantity("a", 4), 4);
		assert_eq!(manager.set_draft_quantity("b", -2), 0);
		assert_eq!(manager.set_draft_quantity_text("c", "3 pieces"), 3);
		assert_eq!(manager.set_draft_quantity_text("d", "many"), 0);

		assert_eq!(manager.draft_quantity("a"), 4);
		assert_eq!(manager.draft_quantity("b"), 0);
		assert_eq!(manager.draft_quantity("c"), 3);
		assert_eq!(manager.draft_quantity("missing"), 0);
		assert!(manager.catalog().is_empty());
	}
}
