//! Parsing of raw text input.
//!
//! Each parser mirrors how the corresponding input field has always been
//! interpreted: quantities take the leading integer, summary inputs fall back
//! to their defaults, and prices must be a non-negative finite number.

/// Parses a price field. Returns `None` when the text is not a usable price.
///
/// Blank text is a price of 0.
pub fn parse_price_input(text: &str) -> Option<f64> {
	let text = text.trim();
	if text.is_empty() {
		return Some(0.0);
	}
	let price = text.parse::<f64>().ok()?;
	if !price.is_finite() || price < 0.0 {
		return None;
	}
	// Normalize negative zero
	Some(if price == 0.0 { 0.0 } else { price })
}

/// Parses a quantity field from its leading integer.
///
/// Leading whitespace and an optional sign are accepted, and parsing stops at
/// the first non-digit. Text without leading digits yields 0.
pub fn parse_quantity_input(text: &str) -> i64 {
	let trimmed = text.trim_start();
	let (negative, rest) = match trimmed.as_bytes().first() {
		Some(b'-') => (true, &trimmed[1..]),
		Some(b'+') => (false, &trimmed[1..]),
		_ => (false, trimmed),
	};

	let digits: &str = rest
		.find(|c: char| !c.is_ascii_digit())
		.map_or(rest, |end| &rest[..end]);
	if digits.is_empty() {
		return 0;
	}

	let value = digits.parse::<i64>().unwrap_or(i64::MAX);
	if negative {
		-value
	} else {
		value
	}
}

/// Parses the surcharge field, falling back to 0.
pub fn parse_surcharge_input(text: &str) -> f64 {
	text.trim()
		.parse::<f64>()
		.ok()
		.filter(|v| v.is_finite())
		.unwrap_or(0.0)
}

/// Parses the headcount field, falling back to 1 for blank or unparsable text.
///
/// An explicit 0 or negative number is kept as entered; the summary guards
/// the division instead.
pub fn parse_people_input(text: &str) -> i64 {
	text.trim().parse::<i64>().unwrap_or(1)
}
