//! Line-oriented interactive session.
//!
//! Each input line is one command. The session applies it to the order state
//! manager and returns the text to show, re-rendering the current screen after
//! every change.

use bill_core::OrderStateManager;
use bill_types::{format_amount, Page};
use std::fmt::Write;
use thiserror::Error;

/// Errors from reading a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
	#[error("Unknown command '{0}', type 'help' for a list")]
	UnknownCommand(String),
	#[error("'{command}' needs {argument}")]
	MissingArgument {
		command: &'static str,
		argument: &'static str,
	},
	#[error("No menu item numbered '{0}'")]
	InvalidItem(String),
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Help,
	Show,
	Quit,
	/// Pending catalog item name.
	Name(String),
	/// Pending catalog item price, as typed.
	Price(String),
	/// Adds the pending item to the catalog.
	Add,
	Proceed,
	Person(String),
	/// Drafted quantity for a 1-based menu position, as typed.
	Quantity { position: usize, text: String },
	/// Adds the drafted quantity of a 1-based menu position to the order.
	Select { position: usize },
	Confirm,
	Next,
	Summary,
	Surcharge(String),
	People(String),
	Back,
}

impl Command {
	/// Parses one input line. Blank lines show the current screen.
	pub fn parse(line: &str) -> Result<Self, SessionError> {
		let line = line.trim();
		let (word, rest) = match line.split_once(char::is_whitespace) {
			Some((word, rest)) => (word, rest.trim()),
			None => (line, ""),
		};

		let command = match word.to_ascii_lowercase().as_str() {
			"" | "show" => Command::Show,
			"help" | "?" => Command::Help,
			"quit" | "exit" => Command::Quit,
			"name" => Command::Name(rest.to_string()),
			"price" => Command::Price(rest.to_string()),
			"add" => Command::Add,
			"proceed" => Command::Proceed,
			"person" => Command::Person(rest.to_string()),
			"qty" => {
				let (position, text) = rest.split_once(char::is_whitespace).ok_or(
					SessionError::MissingArgument {
						command: "qty",
						argument: "an item number and a quantity",
					},
				)?;
				Command::Quantity {
					position: parse_position(position)?,
					text: text.trim().to_string(),
				}
			},
			"select" => {
				if rest.is_empty() {
					return Err(SessionError::MissingArgument {
						command: "select",
						argument: "an item number",
					});
				}
				Command::Select {
					position: parse_position(rest)?,
				}
			},
			"confirm" => Command::Confirm,
			"next" => Command::Next,
			"summary" => Command::Summary,
			"surcharge" => Command::Surcharge(rest.to_string()),
			"people" => Command::People(rest.to_string()),
			"back" => Command::Back,
			other => return Err(SessionError::UnknownCommand(other.to_string())),
		};
		Ok(command)
	}
}

fn parse_position(text: &str) -> Result<usize, SessionError> {
	match text.trim().parse::<usize>() {
		Ok(position) if position > 0 => Ok(position),
		_ => Err(SessionError::InvalidItem(text.trim().to_string())),
	}
}

const HELP: &str = "\
Catalog:     name <text> | price <text> | add | proceed
Order entry: person <name> | qty <item#> <n> | select <item#> | confirm | next | summary
Summary:     surcharge <amount> | people <count> | back
Anywhere:    show | help | quit";

/// Drives the order state manager from text commands.
pub struct Session {
	manager: OrderStateManager,
}

impl Session {
	pub fn new(manager: OrderStateManager) -> Self {
		Self { manager }
	}

	pub fn manager(&self) -> &OrderStateManager {
		&self.manager
	}

	/// Applies a command and returns the text to display.
	pub async fn execute(&mut self, command: Command) -> Result<String, SessionError> {
		let note = match command {
			Command::Help => return Ok(HELP.to_string()),
			Command::Show | Command::Quit => None,
			Command::Name(name) => {
				self.manager.set_new_item_name(name);
				None
			},
			Command::Price(price) => {
				self.manager.set_new_item_price(price);
				None
			},
			Command::Add => Some(match self.manager.submit_new_item().await {
				Some(item) => format!("Added {} at {}", item.name, format_amount(item.price)),
				None => "Enter a name and a valid price first".to_string(),
			}),
			Command::Proceed => {
				if !self.manager.proceed().await {
					Some("Already past the menu".to_string())
				} else {
					None
				}
			},
			Command::Person(name) => {
				self.manager.set_person_name(name);
				None
			},
			Command::Quantity { position, text } => {
				let item_id = self.item_id(position)?;
				self.manager.set_draft_quantity_text(&item_id, &text);
				None
			},
			Command::Select { position } => {
				let item_id = self.item_id(position)?;
				if self.manager.add_draft_to_order(&item_id) {
					None
				} else {
					Some("Set a quantity above zero first".to_string())
				}
			},
			Command::Confirm => Some(match self.manager.confirm_order().await {
				Some(order) => format!("Confirmed order for {}", order.person_name),
				None => "Enter a name and add at least one item first".to_string(),
			}),
			Command::Next => self
				.manager
				.next_person()
				.await
				.map(|order| format!("Saved order for {}", order.person_name)),
			Command::Summary => self
				.manager
				.view_summary()
				.await
				.map(|order| format!("Saved order for {}", order.person_name)),
			Command::Surcharge(text) => {
				self.manager.set_surcharge_text(&text);
				None
			},
			Command::People(text) => {
				self.manager.set_people_count_text(&text);
				None
			},
			Command::Back => {
				self.manager.back();
				None
			},
		};

		let mut out = String::new();
		if let Some(note) = note {
			out.push_str(&note);
			out.push_str("\n\n");
		}
		out.push_str(&render(&self.manager));
		Ok(out)
	}

	fn item_id(&self, position: usize) -> Result<String, SessionError> {
		self.manager
			.catalog()
			.get(position - 1)
			.map(|item| item.id.clone())
			.ok_or_else(|| SessionError::InvalidItem(position.to_string()))
	}
}

/// Renders the screen for the manager's current page.
pub fn render(manager: &OrderStateManager) -> String {
	let mut out = String::new();
	// Writing to a String cannot fail
	let _ = match manager.page() {
		Page::Catalog => render_catalog(manager, &mut out),
		Page::OrderEntry => render_order_entry(manager, &mut out),
		Page::Summary => render_summary(manager, &mut out),
	};
	out
}

fn render_catalog(manager: &OrderStateManager, out: &mut String) -> std::fmt::Result {
	writeln!(out, "== Menu ==")?;
	if manager.catalog().is_empty() {
		writeln!(out, "(no items yet)")?;
	}
	for (index, item) in manager.catalog().iter().enumerate() {
		writeln!(out, "{}. {} {}", index + 1, item.name, format_amount(item.price))?;
	}
	write!(
		out,
		"New item: name '{}', price '{}'",
		manager.new_item_name(),
		manager.new_item_price()
	)
}

fn render_order_entry(manager: &OrderStateManager, out: &mut String) -> std::fmt::Result {
	let order = manager.current_order();
	writeln!(out, "== Order for '{}' ==", order.person_name)?;
	for (index, item) in manager.catalog().iter().enumerate() {
		writeln!(
			out,
			"{}. {} {} [qty {}]",
			index + 1,
			item.name,
			format_amount(item.price),
			manager.draft_quantity(&item.id)
		)?;
	}
	writeln!(out, "Current order:")?;
	for line in order.lines() {
		writeln!(
			out,
			"  {} x{} = {}",
			line.name,
			line.quantity,
			format_amount(line.subtotal())
		)?;
	}
	write!(out, "Total: {}", format_amount(order.total_amount()))
}

fn render_summary(manager: &OrderStateManager, out: &mut String) -> std::fmt::Result {
	let inputs = manager.summary_inputs();
	writeln!(out, "== Summary ==")?;
	writeln!(
		out,
		"Surcharge: {} across {} people",
		format_amount(inputs.surcharge),
		inputs.people_count
	)?;
	write!(out, "{}", manager.summary())
}
