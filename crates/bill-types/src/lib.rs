//! Common types module for the bill counter.
//!
//! This module defines the core data types shared by every crate in the
//! workspace: the menu catalog entries, per-person orders, the draft selection,
//! navigation pages, storage keys and state events. Keeping them in one place
//! guarantees the persisted format stays consistent across components.

/// State change events published to observers.
pub mod events;
/// Screen identifiers for the navigation state machine.
pub mod navigation;
/// Menu items, order lines, orders and the draft selection.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Storage keys for the persisted collections.
pub mod storage;
/// Formatting and input parsing helpers.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use events::*;
pub use navigation::*;
pub use order::*;
pub use registry::*;
pub use storage::*;
pub use utils::{
	format_amount, parse_people_input, parse_price_input, parse_quantity_input,
	parse_surcharge_input, truncate_id,
};
pub use validation::*;
