//! Utility functions for display formatting and raw input parsing.
//!
//! Front-ends collect text from the user; these helpers turn it into the
//! typed values the state manager works with, and format amounts for display.

pub mod formatting;
pub mod input;

pub use formatting::{format_amount, truncate_id};
pub use input::{parse_people_input, parse_price_input, parse_quantity_input, parse_surcharge_input};
