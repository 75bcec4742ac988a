//! Event bus for observing state changes.
//!
//! Wraps a tokio broadcast channel. Every subscriber receives every event
//! published after it subscribed; publishing with no subscribers is not an error
//! worth reporting, so callers discard the result.

use bill_types::StateEvent;
use tokio::sync::broadcast;

/// Events buffered per subscriber when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Broadcast channel carrying [`StateEvent`]s to any number of observers.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<StateEvent>,
}

impl EventBus {
	/// Creates a bus that buffers up to `capacity` events per slow subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Returns a receiver for events published from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event, returning the number of subscribers reached.
	pub fn publish(
		&self,
		event: StateEvent,
	) -> Result<usize, broadcast::error::SendError<StateEvent>> {
		self.sender.send(event)
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}
}
