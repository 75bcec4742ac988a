//! Order-related types for the bill counter.
//!
//! This module defines the menu catalog entry, the order line snapshot, the
//! per-person order and the transient draft selection used while one person's
//! order is being entered.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// An orderable item in the menu catalog.
///
/// The id is generated once at creation and never changes. Items are never
/// edited or removed after they are added to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
	/// Unique identifier for this item.
	pub id: String,
	/// Display name, trimmed and non-empty.
	pub name: String,
	/// Unit price, finite and non-negative.
	pub price: f64,
}

impl FoodItem {
	/// Creates a new item with a freshly generated id.
	pub fn new(name: impl Into<String>, price: f64) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			name: name.into(),
			price,
		}
	}
}

/// A line within an order.
///
/// Name and price are copied from the catalog item when the line is created,
/// so later catalog changes never alter a recorded order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
	/// Id of the catalog item this line was created from.
	pub id: String,
	/// Item name at selection time.
	pub name: String,
	/// Unit price at selection time.
	pub price: f64,
	/// Number of units ordered.
	pub quantity: u32,
}

impl OrderLine {
	/// Snapshots a catalog item into a new line.
	pub fn from_item(item: &FoodItem, quantity: u32) -> Self {
		Self {
			id: item.id.clone(),
			name: item.name.clone(),
			price: item.price,
			quantity,
		}
	}

	/// Price multiplied by quantity.
	pub fn subtotal(&self) -> f64 {
		self.price * f64::from(self.quantity)
	}
}

/// Sums the subtotals of the given lines. No lines sum to `0.0`.
pub fn lines_total(lines: &[OrderLine]) -> f64 {
	// An empty f64 sum is -0.0
	lines.iter().map(OrderLine::subtotal).sum::<f64>() + 0.0
}

/// An order for one person.
///
/// The total is derived from the lines and recomputed on every mutation; it
/// cannot be set directly. The serialized field names match the format the
/// order ledger has always been stored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier, empty while the order is still in progress.
	pub id: String,
	/// Name of the person this order belongs to.
	pub person_name: String,
	#[serde(rename = "foodItems")]
	lines: Vec<OrderLine>,
	total_amount: f64,
}

impl Order {
	/// Creates a blank in-progress order.
	pub fn empty() -> Self {
		Self {
			id: String::new(),
			person_name: String::new(),
			lines: Vec::new(),
			total_amount: 0.0,
		}
	}

	/// Creates a finalized order with a fresh id.
	pub fn new(person_name: impl Into<String>, lines: Vec<OrderLine>) -> Self {
		let total_amount = lines_total(&lines);
		Self {
			id: Uuid::new_v4().to_string(),
			person_name: person_name.into(),
			lines,
			total_amount,
		}
	}

	/// Lines in selection order.
	pub fn lines(&self) -> &[OrderLine] {
		&self.lines
	}

	/// Sum of price times quantity over all lines.
	pub fn total_amount(&self) -> f64 {
		self.total_amount
	}

	/// Returns true when the order has no lines.
	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// Adds `quantity` units of `item` on top of any existing selection.
	///
	/// An existing line for the same item id has its quantity increased;
	/// otherwise a new line is appended. A quantity of zero changes nothing.
	pub fn add_quantity(&mut self, item: &FoodItem, quantity: u32) {
		if quantity == 0 {
			return;
		}
		match self.lines.iter_mut().find(|line| line.id == item.id) {
			Some(line) => line.quantity = line.quantity.saturating_add(quantity),
			None => self.lines.push(OrderLine::from_item(item, quantity)),
		}
		self.total_amount = lines_total(&self.lines);
	}
}

impl Default for Order {
	fn default() -> Self {
		Self::empty()
	}
}

/// Transient per-item quantities for the person currently being entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftSelection {
	quantities: HashMap<String, u32>,
}

impl DraftSelection {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the quantity for an item and returns the stored value.
	///
	/// Negative input is clamped to zero.
	pub fn set(&mut self, item_id: impl Into<String>, quantity: i64) -> u32 {
		let clamped = quantity.clamp(0, i64::from(u32::MAX)) as u32;
		self.quantities.insert(item_id.into(), clamped);
		clamped
	}

	/// Quantity for an item, zero when unset.
	pub fn get(&self, item_id: &str) -> u32 {
		self.quantities.get(item_id).copied().unwrap_or(0)
	}

	pub fn clear(&mut self) {
		self.quantities.clear();
	}

	pub fn is_empty(&self) -> bool {
		self.quantities.is_empty()
	}

	/// Builds order lines from the catalog and the drafted quantities.
	///
	/// Catalog order is preserved and items with a zero or unset quantity are
	/// left out.
	pub fn materialize(&self, catalog: &[FoodItem]) -> Vec<OrderLine> {
		catalog
			.iter()
			.map(|item| OrderLine::from_item(item, self.get(&item.id)))
			.filter(|line| line.quantity > 0)
			.collect()
	}
}
