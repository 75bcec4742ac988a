//! The order state manager.
//!
//! One owned aggregate holds the menu catalog, the order ledger, the current
//! order, the draft selection and the navigation state. All mutation goes
//! through `&mut self`; every change is published on the event bus and every
//! catalog or ledger mutation is persisted.
//!
//! Operations are split by screen: [`catalog`] for the catalog editor,
//! [`order`] for the order builder, and navigation and summary inputs here.

pub mod catalog;
pub mod navigation;
pub mod order;

pub use navigation::{NavigationAction, NavigationError, Navigator};

use crate::event_bus::EventBus;
use crate::persistence::Persistence;
use crate::summary::{Summary, SummaryInputs};
use bill_types::{
	parse_people_input, parse_surcharge_input, DraftSelection, FoodItem, NavigationEvent, Order,
	Page, StateEvent, SummaryEvent,
};
use std::time::Duration;
use tokio::sync::broadcast;

/// Owns all bill counter state and performs every transition.
pub struct OrderStateManager {
	/// Menu catalog, in insertion order.
	catalog: Vec<FoodItem>,
	/// Finalized orders, append-only.
	ledger: Vec<Order>,
	/// Order being entered for the active person.
	current_order: Order,
	/// Per-item quantities for the active person.
	draft: DraftSelection,
	navigator: Navigator,
	/// Pending catalog editor input.
	new_item_name: String,
	new_item_price: String,
	summary_inputs: SummaryInputs,
	persistence: Persistence,
	event_bus: EventBus,
	/// Wait between leaving the catalog and showing order entry.
	proceed_delay: Duration,
}

impl OrderStateManager {
	/// Creates an empty manager. Call [`load`](Self::load) to read persisted state.
	pub fn new(persistence: Persistence, event_bus: EventBus) -> Self {
		Self {
			catalog: Vec::new(),
			ledger: Vec::new(),
			current_order: Order::empty(),
			draft: DraftSelection::new(),
			navigator: Navigator::new(),
			new_item_name: String::new(),
			new_item_price: String::new(),
			summary_inputs: SummaryInputs::default(),
			persistence,
			event_bus,
			proceed_delay: Duration::ZERO,
		}
	}

	pub fn with_proceed_delay(mut self, delay: Duration) -> Self {
		self.proceed_delay = delay;
		self
	}

	pub fn with_summary_inputs(mut self, inputs: SummaryInputs) -> Self {
		self.summary_inputs = inputs;
		self
	}

	/// Replaces the catalog and ledger with the persisted values.
	pub async fn load(&mut self) {
		self.catalog = self.persistence.load_catalog().await;
		self.ledger = self.persistence.load_ledger().await;
		tracing::info!(
			items = self.catalog.len(),
			orders = self.ledger.len(),
			"Loaded persisted state"
		);
	}

	/// Subscribes to state change events.
	pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
		self.event_bus.subscribe()
	}

	pub fn catalog(&self) -> &[FoodItem] {
		&self.catalog
	}

	pub fn ledger(&self) -> &[Order] {
		&self.ledger
	}

	pub fn current_order(&self) -> &Order {
		&self.current_order
	}

	pub fn draft(&self) -> &DraftSelection {
		&self.draft
	}

	pub fn page(&self) -> Page {
		self.navigator.page()
	}

	pub fn is_loading(&self) -> bool {
		self.navigator.is_loading()
	}

	/// Leaves the catalog editor for order entry after the proceed delay.
	///
	/// Ignored when not on the catalog page or while a proceed is running.
	/// Returns whether the page changed. Dropping the future during the delay
	/// leaves the catalog page shown and clears the loading flag.
	pub async fn proceed(&mut self) -> bool {
		let delay = self.proceed_delay;
		let guard = match self.navigator.begin_loading() {
			Ok(guard) => guard,
			Err(e) => {
				tracing::debug!(error = %e, "Ignoring proceed");
				return false;
			},
		};
		self.event_bus
			.publish(StateEvent::Navigation(NavigationEvent::Loading))
			.ok();

		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}

		match guard.finish() {
			Ok((from, to)) => {
				self.publish(StateEvent::Navigation(NavigationEvent::PageChanged { from, to }));
				true
			},
			Err(e) => {
				tracing::warn!(error = %e, "Proceed failed after delay");
				false
			},
		}
	}

	/// Returns from the summary to order entry without touching any data.
	pub fn back(&mut self) -> bool {
		self.navigate(NavigationAction::Back)
	}

	/// Current summary view over the ledger.
	pub fn summary(&self) -> Summary<'_> {
		Summary::new(&self.ledger, self.summary_inputs)
	}

	pub fn summary_inputs(&self) -> SummaryInputs {
		self.summary_inputs
	}

	/// Sets the surcharge. Non-finite values are stored as zero.
	pub fn set_surcharge(&mut self, surcharge: f64) {
		self.summary_inputs.surcharge = if surcharge.is_finite() {
			surcharge
		} else {
			0.0
		};
		self.publish_summary_inputs();
	}

	pub fn set_surcharge_text(&mut self, text: &str) {
		self.set_surcharge(parse_surcharge_input(text));
	}

	/// Sets the headcount the surcharge is split across.
	pub fn set_people_count(&mut self, people_count: i64) {
		self.summary_inputs.people_count = people_count;
		self.publish_summary_inputs();
	}

	pub fn set_people_count_text(&mut self, text: &str) {
		self.set_people_count(parse_people_input(text));
	}

	fn publish_summary_inputs(&self) {
		let SummaryInputs {
			surcharge,
			people_count,
		} = self.summary_inputs;
		self.publish(StateEvent::Summary(SummaryEvent::InputsChanged {
			surcharge,
			people_count,
		}));
	}

	/// Applies a navigation action and publishes the page change.
	fn navigate(&mut self, action: NavigationAction) -> bool {
		match self.navigator.apply(action) {
			Ok((from, to)) => {
				self.publish(StateEvent::Navigation(NavigationEvent::PageChanged { from, to }));
				true
			},
			Err(e) => {
				tracing::debug!(error = %e, "Ignoring navigation");
				false
			},
		}
	}

	fn publish(&self, event: StateEvent) {
		// No subscribers is fine
		self.event_bus.publish(event).ok();
	}
}
