//! Navigation types for the bill counter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The screen currently shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Page {
	/// Catalog editor, the initial screen.
	#[default]
	Catalog,
	/// Order entry for the active person.
	OrderEntry,
	/// Summary of all finalized orders.
	Summary,
}

impl Page {
	/// Returns the string representation of the page.
	pub fn as_str(&self) -> &'static str {
		match self {
			Page::Catalog => "catalog",
			Page::OrderEntry => "order-entry",
			Page::Summary => "summary",
		}
	}
}

impl fmt::Display for Page {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
