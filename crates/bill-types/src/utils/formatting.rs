//! String formatting utilities.

/// Utility function to truncate an id for display and log fields.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((idx, _)) => format!("{}..", &id[..idx]),
		None => id.to_string(),
	}
}

/// Formats an amount with exactly two decimal places.
pub fn format_amount(amount: f64) -> String {
	// Avoid rendering "-0.00" for values that round to zero
	let rounded = (amount * 100.0).round() / 100.0;
	if rounded == 0.0 {
		return "0.00".to_string();
	}
	format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("abc"), "abc");
		assert_eq!(truncate_id("12345678"), "12345678");
		assert_eq!(
			truncate_id("0f8fad5b-d9cb-469f-a165-70867728950e"),
			"0f8fad5b.."
		);
	}

	#[test]
	fn test_format_amount() {
		assert_eq!(format_amount(12.0), "12.00");
		assert_eq!(format_amount(2.5), "2.50");
		assert_eq!(format_amount(10.0 / 3.0), "3.33");
		assert_eq!(format_amount(-0.001), "0.00");
	}
}
