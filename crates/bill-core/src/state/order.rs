//! Order builder operations.
//!
//! The active person's selection lives in two places: the current order,
//! which accumulates lines as items are added, and the draft selection of
//! per-item quantities. Every commit builds the finalized order from the
//! draft selection, so the ledger always records what the person drafted.

use super::{NavigationAction, OrderStateManager};
use bill_types::{truncate_id, FoodItem, Order, OrderEvent, StateEvent};
use tracing::instrument;

impl OrderStateManager {
	/// Sets the name of the person whose order is being entered.
	pub fn set_person_name(&mut self, name: impl Into<String>) {
		self.current_order.person_name = name.into();
		self.publish_current_order();
	}

	/// Adds units of an item to the current order.
	///
	/// An item already in the order has its quantity increased; otherwise a
	/// new line is appended. The total is recomputed.
	pub fn select_food(&mut self, item: &FoodItem, quantity: u32) {
		self.current_order.add_quantity(item, quantity);
		tracing::debug!(
			item_id = %truncate_id(&item.id),
			quantity,
			total = self.current_order.total_amount(),
			"Selected item"
		);
		self.publish_current_order();
	}

	/// Adds an item to the current order using its drafted quantity.
	///
	/// Does nothing for unknown items or a drafted quantity of zero.
	pub fn add_draft_to_order(&mut self, item_id: &str) -> bool {
		let quantity = self.draft.get(item_id);
		if quantity == 0 {
			tracing::debug!(item_id = %truncate_id(item_id), "No quantity drafted");
			return false;
		}
		let Some(item) = self.catalog.iter().find(|item| item.id == item_id).cloned() else {
			tracing::debug!(item_id = %truncate_id(item_id), "Unknown catalog item");
			return false;
		};
		self.select_food(&item, quantity);
		true
	}

	/// Builds an order for the active person from the draft selection.
	///
	/// Lines follow catalog order and zero quantities are left out. The
	/// returned order has a fresh id and is not added to the ledger.
	pub fn materialize_draft(&self) -> Order {
		Order::new(
			self.current_order.person_name.trim(),
			self.draft.materialize(&self.catalog),
		)
	}

	/// Whether the current order may be committed: a person name is set and
	/// at least one item has been added.
	pub fn can_commit(&self) -> bool {
		!self.current_order.person_name.trim().is_empty() && !self.current_order.is_empty()
	}

	/// Commits the current order and stays on order entry.
	///
	/// Does nothing unless on the order entry page with a committable order.
	#[instrument(skip_all)]
	pub async fn confirm_order(&mut self) -> Option<Order> {
		if self.navigator.target(NavigationAction::Confirm).is_err() || !self.can_commit() {
			tracing::debug!("Nothing to confirm");
			return None;
		}
		let order = self.commit().await;
		self.reset_current_order();
		self.clear_draft();
		self.navigate(NavigationAction::Confirm);
		Some(order)
	}

	/// Commits the current order, if committable, and starts the next person.
	///
	/// The draft selection is cleared and order entry is shown even when
	/// nothing was committed.
	#[instrument(skip_all)]
	pub async fn next_person(&mut self) -> Option<Order> {
		if self.navigator.target(NavigationAction::NextPerson).is_err() {
			tracing::debug!(page = %self.page(), "Ignoring next person");
			return None;
		}
		let order = if self.can_commit() {
			let order = self.commit().await;
			self.reset_current_order();
			Some(order)
		} else {
			tracing::debug!("Nothing to commit for this person");
			None
		};
		self.clear_draft();
		self.navigate(NavigationAction::NextPerson);
		order
	}

	/// Commits the current order, if committable, and shows the summary.
	///
	/// Neither the current order nor the draft selection is reset.
	#[instrument(skip_all)]
	pub async fn view_summary(&mut self) -> Option<Order> {
		if self.navigator.target(NavigationAction::ViewSummary).is_err() {
			tracing::debug!(page = %self.page(), "Ignoring view summary");
			return None;
		}
		let order = if self.can_commit() {
			Some(self.commit().await)
		} else {
			None
		};
		self.navigate(NavigationAction::ViewSummary);
		order
	}

	/// Appends the materialized draft to the ledger and persists it.
	async fn commit(&mut self) -> Order {
		let order = self.materialize_draft();
		self.ledger.push(order.clone());
		tracing::info!(
			order_id = %truncate_id(&order.id),
			person = %order.person_name,
			lines = order.lines().len(),
			total = order.total_amount(),
			"Committed order"
		);
		self.persistence.save_ledger(&self.ledger).await;
		self.publish(StateEvent::Order(OrderEvent::Committed {
			order: order.clone(),
		}));
		order
	}

	fn reset_current_order(&mut self) {
		self.current_order = Order::empty();
		self.publish_current_order();
	}

	fn clear_draft(&mut self) {
		self.draft.clear();
		self.publish(StateEvent::Order(OrderEvent::DraftCleared));
	}

	fn publish_current_order(&self) {
		self.publish(StateEvent::Order(OrderEvent::CurrentOrderUpdated {
			order: self.current_order.clone(),
		}));
	}
}

#[cfg(test)]
mod tests {
	use super::super::test_support::*;
	use bill_types::{OrderEvent, Page, StateEvent};

	#[tokio::test]
	async fn test_select_food_accumulates() {
		let mut manager = manager_at_order_entry().await;
		let burger = manager.catalog()[0].clone();
		let fries = manager.catalog()[1].clone();

		manager.select_food(&burger, 1);
		manager.select_food(&fries, 3);
		manager.select_food(&burger, 2);

		let order = manager.current_order();
		assert_eq!(order.lines().len(), 2);
		assert_eq!(order.lines()[0].quantity, 3);
		assert_eq!(order.total_amount(), 21.0);
	}

	#[tokio::test]
	async fn test_select_zero_quantity_is_not_committable() {
		let mut manager = manager_at_order_entry().await;
		let burger = manager.catalog()[0].clone();
		manager.set_person_name("Alice");

		manager.select_food(&burger, 0);
		assert!(manager.current_order().is_empty());
		assert!(!manager.can_commit());
		assert!(manager.confirm_order().await.is_none());
		assert!(manager.ledger().is_empty());
	}

	#[tokio::test]
	async fn test_add_draft_requires_positive_quantity() {
		let mut manager = manager_at_order_entry().await;
		let burger = item_id(&manager, "Burger");

		assert!(!manager.add_draft_to_order(&burger));
		manager.set_draft_quantity(&burger, 2);
		assert!(manager.add_draft_to_order(&burger));
		assert!(!manager.add_draft_to_order("not-in-catalog"));

		assert_eq!(manager.current_order().lines()[0].quantity, 2);
		assert_eq!(manager.current_order().total_amount(), 10.0);
	}

	#[tokio::test]
	async fn test_materialize_draft_skips_zero_lines() {
		let mut manager = manager_at_order_entry().await;
		let burger = item_id(&manager, "Burger");
		let fries = item_id(&manager, "Fries");
		manager.set_person_name(" Alice ");
		manager.set_draft_quantity(&burger, 0);
		manager.set_draft_quantity(&fries, 2);

		let order = manager.materialize_draft();
		assert_eq!(order.person_name, "Alice");
		assert_eq!(order.lines().len(), 1);
		assert!(order.lines().iter().all(|line| line.quantity > 0));
		assert_eq!(order.total_amount(), 4.0);
		assert!(!order.id.is_empty());
		assert!(manager.ledger().is_empty());
	}

	#[tokio::test]
	async fn test_confirm_requires_name_and_lines() {
		let mut manager = manager_at_order_entry().await;
		let burger = item_id(&manager, "Burger");
		manager.set_draft_quantity(&burger, 1);
		manager.add_draft_to_order(&burger);

		manager.set_person_name("   ");
		assert!(manager.confirm_order().await.is_none());
		assert!(manager.ledger().is_empty());
		assert_eq!(manager.draft_quantity(&burger), 1);

		let mut without_lines = manager_at_order_entry().await;
		without_lines.set_person_name("Bob");
		assert!(without_lines.confirm_order().await.is_none());
		assert!(without_lines.ledger().is_empty());

		manager.set_person_name("Bob");
		let order = manager.confirm_order().await.unwrap();
		assert_eq!(order.person_name, "Bob");
		assert_eq!(order.total_amount(), 5.0);
		assert_eq!(manager.ledger().len(), 1);
		assert!(manager.current_order().is_empty());
		assert_eq!(manager.current_order().person_name, "");
		assert!(manager.draft().is_empty());
		assert_eq!(manager.page(), Page::OrderEntry);
	}

	#[tokio::test]
	async fn test_confirm_ignored_outside_order_entry() {
		let mut manager = manager();
		manager.add_food_item("Burger", "5").await;
		let burger = manager.catalog()[0].clone();
		manager.set_person_name("Alice");
		manager.select_food(&burger, 1);

		assert!(manager.confirm_order().await.is_none());
		assert!(manager.next_person().await.is_none());
		assert!(manager.view_summary().await.is_none());
		assert!(manager.ledger().is_empty());
		assert_eq!(manager.page(), Page::Catalog);
	}

	#[tokio::test]
	async fn test_next_person_without_preconditions_still_resets_draft() {
		let mut manager = manager_at_order_entry().await;
		let fries = item_id(&manager, "Fries");
		manager.set_person_name("Carol");
		manager.set_draft_quantity(&fries, 2);

		assert!(manager.next_person().await.is_none());
		assert!(manager.ledger().is_empty());
		assert!(manager.draft().is_empty());
		assert_eq!(manager.current_order().person_name, "Carol");
		assert_eq!(manager.page(), Page::OrderEntry);
	}

	#[tokio::test]
	async fn test_next_person_commits_draft() {
		let mut manager = manager_at_order_entry().await;
		let burger = item_id(&manager, "Burger");
		let fries = item_id(&manager, "Fries");
		manager.set_person_name("Dave");
		manager.set_draft_quantity(&burger, 1);
		manager.add_draft_to_order(&burger);
		manager.set_draft_quantity(&fries, 3);

		let order = manager.next_person().await.unwrap();
		assert_eq!(order.lines().len(), 2);
		assert_eq!(order.total_amount(), 11.0);
		assert_eq!(manager.ledger(), &[order]);
		assert!(manager.current_order().is_empty());
		assert!(manager.draft().is_empty());
	}

	#[tokio::test]
	async fn test_view_summary_scenario() {
		let mut manager = manager_at_order_entry().await;
		let burger = item_id(&manager, "Burger");
		let fries = item_id(&manager, "Fries");
		manager.set_person_name("Alice");
		manager.set_draft_quantity(&burger, 2);
		manager.set_draft_quantity(&fries, 1);
		manager.add_draft_to_order(&burger);

		let order = manager.view_summary().await.unwrap();
		assert_eq!(manager.page(), Page::Summary);
		assert_eq!(manager.ledger().len(), 1);
		assert_eq!(order.person_name, "Alice");
		assert_eq!(order.lines().len(), 2);
		assert_eq!(order.lines()[0].name, "Burger");
		assert_eq!(order.lines()[0].quantity, 2);
		assert_eq!(order.lines()[0].subtotal(), 10.0);
		assert_eq!(order.lines()[1].name, "Fries");
		assert_eq!(order.lines()[1].quantity, 1);
		assert_eq!(order.lines()[1].subtotal(), 2.0);
		assert_eq!(order.total_amount(), 12.0);

		// Draft and current order survive the trip to the summary
		assert_eq!(manager.draft_quantity(&burger), 2);
		assert!(!manager.current_order().is_empty());

		assert!(manager.back());
		assert_eq!(manager.page(), Page::OrderEntry);
		assert_eq!(manager.ledger().len(), 1);
	}

	#[tokio::test]
	async fn test_view_summary_without_order_only_navigates() {
		let mut manager = manager_at_order_entry().await;
		assert!(manager.view_summary().await.is_none());
		assert_eq!(manager.page(), Page::Summary);
		assert!(manager.ledger().is_empty());
	}

	#[tokio::test]
	async fn test_commit_totals_match_lines() {
		let mut manager = manager_at_order_entry().await;
		let burger = item_id(&manager, "Burger");
		let fries = item_id(&manager, "Fries");
		for (name, burgers, fries_count) in [("A", 1, 4), ("B", 3, 0), ("C", 2, 2)] {
			manager.set_person_name(name);
			manager.set_draft_quantity(&burger, burgers);
			manager.set_draft_quantity(&fries, fries_count);
			manager.add_draft_to_order(&burger);
			manager.add_draft_to_order(&fries);
			manager.confirm_order().await.unwrap();
		}

		for order in manager.ledger() {
			let expected: f64 = order.lines().iter().map(|l| l.subtotal()).sum();
			assert_eq!(order.total_amount(), expected);
		}
		assert_eq!(manager.summary().total_revenue(), 42.0);
	}

	#[tokio::test]
	async fn test_commit_publishes_event() {
		let mut manager = manager_at_order_entry().await;
		let burger = item_id(&manager, "Burger");
		manager.set_person_name("Eve");
		manager.set_draft_quantity(&burger, 1);
		manager.add_draft_to_order(&burger);

		let mut events = manager.subscribe();
		let order = manager.confirm_order().await.unwrap();

		let mut committed = None;
		while let Ok(event) = events.try_recv() {
			if let StateEvent::Order(OrderEvent::Committed { order }) = event {
				committed = Some(order);
			}
		}
		assert_eq!(committed, Some(order));
	}
}
