//! Summary aggregation over the order ledger.
//!
//! The summary is a read-only view: it never mutates the ledger. A flat
//! surcharge is split evenly across a headcount and added on top of every
//! order's total.

use bill_types::{format_amount, Order};
use std::fmt;

/// Surcharge and headcount entered on the summary screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryInputs {
	pub surcharge: f64,
	pub people_count: i64,
}

impl Default for SummaryInputs {
	fn default() -> Self {
		Self {
			surcharge: 0.0,
			people_count: 1,
		}
	}
}

impl SummaryInputs {
	/// Surcharge divided by the headcount, zero when the headcount is not positive.
	pub fn surcharge_per_person(&self) -> f64 {
		if self.people_count > 0 {
			self.surcharge / self.people_count as f64
		} else {
			0.0
		}
	}
}

/// Borrowed view of the ledger with the summary inputs applied.
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
	orders: &'a [Order],
	inputs: SummaryInputs,
}

impl<'a> Summary<'a> {
	pub fn new(orders: &'a [Order], inputs: SummaryInputs) -> Self {
		Self { orders, inputs }
	}

	pub fn orders(&self) -> &'a [Order] {
		self.orders
	}

	pub fn inputs(&self) -> SummaryInputs {
		self.inputs
	}

	/// Sum of all order totals.
	pub fn total_revenue(&self) -> f64 {
		self.orders.iter().map(Order::total_amount).sum()
	}

	pub fn surcharge_per_person(&self) -> f64 {
		self.inputs.surcharge_per_person()
	}

	/// An order's total plus one share of the surcharge.
	pub fn adjusted_total(&self, order: &Order) -> f64 {
		order.total_amount() + self.surcharge_per_person()
	}

	/// Orders paired with their adjusted totals, in ledger order.
	pub fn adjusted_totals(&self) -> impl Iterator<Item = (&'a Order, f64)> + '_ {
		self.orders
			.iter()
			.map(move |order| (order, self.adjusted_total(order)))
	}
}

impl fmt::Display for Summary<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.orders.is_empty() {
			writeln!(f, "No orders yet.")?;
		}
		for (order, adjusted) in self.adjusted_totals() {
			writeln!(f, "{}", order.person_name)?;
			for line in order.lines() {
				writeln!(
					f,
					"  {} x{} @ {} = {}",
					line.name,
					line.quantity,
					format_amount(line.price),
					format_amount(line.subtotal())
				)?;
			}
			writeln!(f, "  Total: {}", format_amount(order.total_amount()))?;
			writeln!(
				f,
				"  Surcharge share: {}",
				format_amount(self.surcharge_per_person())
			)?;
			writeln!(f, "  Total with surcharge: {}", format_amount(adjusted))?;
		}
		write!(f, "Total revenue: {}", format_amount(self.total_revenue()))
	}
}
