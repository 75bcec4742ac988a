//! Navigation state machine.
//!
//! Three screens, cycled under user control: catalog -> order entry, order
//! entry -> order entry (confirm / next person), order entry -> summary, and
//! summary -> order entry. Nothing leads back to the catalog and no state is
//! terminal.

use bill_types::Page;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while navigating.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
	#[error("Action {action:?} is not available on the {from} page")]
	InvalidTransition { from: Page, action: NavigationAction },
	#[error("A page transition is already in progress")]
	Busy,
}

/// User actions that move between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationAction {
	/// Leave the catalog editor for order entry.
	Proceed,
	/// Commit the current order and stay on order entry.
	Confirm,
	/// Commit the current order and start the next person.
	NextPerson,
	/// Show the summary.
	ViewSummary,
	/// Return from the summary to order entry.
	Back,
}

/// Static transition table: (page, action) -> next page.
static TRANSITIONS: Lazy<HashMap<(Page, NavigationAction), Page>> = Lazy::new(|| {
	HashMap::from([
		((Page::Catalog, NavigationAction::Proceed), Page::OrderEntry),
		((Page::OrderEntry, NavigationAction::Confirm), Page::OrderEntry),
		((Page::OrderEntry, NavigationAction::NextPerson), Page::OrderEntry),
		((Page::OrderEntry, NavigationAction::ViewSummary), Page::Summary),
		((Page::Summary, NavigationAction::Back), Page::OrderEntry),
	])
});

/// Tracks the visible page and the proceed loading indicator.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
	page: Page,
	loading: bool,
}

impl Navigator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn page(&self) -> Page {
		self.page
	}

	/// True while the proceed delay is running.
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	/// Returns the page an action leads to from the current page.
	pub fn target(&self, action: NavigationAction) -> Result<Page, NavigationError> {
		if self.loading {
			return Err(NavigationError::Busy);
		}
		TRANSITIONS
			.get(&(self.page, action))
			.copied()
			.ok_or(NavigationError::InvalidTransition {
				from: self.page,
				action,
			})
	}

	/// Applies an action, returning the (previous, new) pages.
	pub fn apply(&mut self, action: NavigationAction) -> Result<(Page, Page), NavigationError> {
		let to = self.target(action)?;
		let from = std::mem::replace(&mut self.page, to);
		Ok((from, to))
	}

	/// Marks the start of the proceed delay.
	///
	/// The flag stays set for as long as the returned guard lives.
	pub(crate) fn begin_loading(&mut self) -> Result<LoadingGuard<'_>, NavigationError> {
		self.target(NavigationAction::Proceed)?;
		self.loading = true;
		Ok(LoadingGuard { navigator: self })
	}
}

/// Holds the loading flag during the proceed delay.
///
/// Dropping the guard without calling [`finish`](Self::finish) leaves the
/// page unchanged and clears the flag, so an abandoned proceed can be retried.
pub(crate) struct LoadingGuard<'a> {
	navigator: &'a mut Navigator,
}

impl LoadingGuard<'_> {
	/// Ends the proceed delay and switches to order entry.
	pub(crate) fn finish(self) -> Result<(Page, Page), NavigationError> {
		self.navigator.loading = false;
		self.navigator.apply(NavigationAction::Proceed)
	}
}

impl Drop for LoadingGuard<'_> {
	fn drop(&mut self) {
		self.navigator.loading = false;
	}
}
