//! Event types for observing state changes.
//!
//! Every mutation of the order state manager publishes one of these events on
//! the event bus, so front-ends can re-render without polling the state.

use crate::{FoodItem, Order, Page};
use serde::{Deserialize, Serialize};

/// Main event type encompassing all state events.
///
/// Events are categorized by the part of the state they concern, allowing
/// consumers to filter and handle specific event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StateEvent {
	/// Events from the catalog editor.
	Catalog(CatalogEvent),
	/// Events from the order builder.
	Order(OrderEvent),
	/// Events from the navigation state machine.
	Navigation(NavigationEvent),
	/// Events from the summary aggregator.
	Summary(SummaryEvent),
}

/// Events related to the menu catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CatalogEvent {
	/// A new item has been appended to the catalog.
	ItemAdded { item: FoodItem },
	/// The pending name or price input has changed.
	InputChanged,
}

/// Events related to order building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A draft quantity has been set.
	DraftUpdated { item_id: String, quantity: u32 },
	/// The draft selection has been cleared.
	DraftCleared,
	/// The current order changed (name or lines).
	CurrentOrderUpdated { order: Order },
	/// An order has been appended to the ledger.
	Committed { order: Order },
}

/// Events related to navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NavigationEvent {
	/// The proceed delay has started.
	Loading,
	/// The visible page changed.
	PageChanged { from: Page, to: Page },
}

/// Events related to the summary inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SummaryEvent {
	/// The surcharge or headcount input changed.
	InputsChanged { surcharge: f64, people_count: i64 },
}
