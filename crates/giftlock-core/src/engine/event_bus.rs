//! Event bus implementation for batch progress reporting.
//!
//! This module provides a broadcast-based event bus through which the batch
//! engine reports entry transitions and summary updates to any number of
//! observers, such as a progress display.

use giftlock_types::GiftlockEvent;
use tokio::sync::broadcast;

/// Event bus for broadcasting engine events to multiple subscribers.
///
/// The EventBus uses tokio's broadcast channel so several observers can
/// follow one batch run independently. Publishing never blocks the engine;
/// a slow subscriber misses events rather than stalling sends.
pub struct EventBus {
	/// The broadcast sender used to publish events.
	sender: broadcast::Sender<GiftlockEvent>,
}

impl EventBus {
	/// Creates a new EventBus with the specified channel capacity.
	///
	/// The capacity determines how many events can be buffered per
	/// subscriber before the oldest are dropped.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Creates a new subscriber to receive events from this bus.
	///
	/// Each subscriber receives its own copy of all events published after
	/// the subscription is created.
	pub fn subscribe(&self) -> broadcast::Receiver<GiftlockEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns an error when there are no active subscribers; the engine
	/// ignores that case since running without an observer is legitimate.
	pub fn publish(
		&self,
		event: GiftlockEvent,
	) -> Result<(), broadcast::error::SendError<GiftlockEvent>> {
		self.sender.send(event)?;
		Ok(())
	}
}

/// Implementation of Clone for EventBus to allow sharing across tasks.
///
/// Cloning an EventBus creates a new handle to the same underlying
/// broadcast channel.
impl Clone for EventBus {
	fn clone(&self) -> Self {
		Self {
			sender: self.sender.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use giftlock_types::{BatchEvent, EntryEvent, EntryStatus};

	fn status_event(entry_id: &str, status: EntryStatus) -> GiftlockEvent {
		GiftlockEvent::Entry(EntryEvent::StatusChanged {
			entry_id: entry_id.to_string(),
			row: 2,
			status,
			error: None,
		})
	}

	#[tokio::test]
	async fn test_publish_and_receive_event() {
		let event_bus = EventBus::new(10);
		let mut receiver = event_bus.subscribe();

		event_bus
			.publish(status_event("row-2", EntryStatus::Validating))
			.unwrap();

		let received = receiver.recv().await.unwrap();
		match received {
			GiftlockEvent::Entry(EntryEvent::StatusChanged { entry_id, status, .. }) => {
				assert_eq!(entry_id, "row-2");
				assert_eq!(status, EntryStatus::Validating);
			},
			other => panic!("unexpected event {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_multiple_subscribers_receive_same_event() {
		let event_bus = EventBus::new(10);
		let mut receiver1 = event_bus.subscribe();
		let mut receiver2 = event_bus.subscribe();

		event_bus
			.publish(GiftlockEvent::Batch(BatchEvent::Loaded { total: 3 }))
			.unwrap();

		assert_eq!(
			receiver1.recv().await.unwrap(),
			GiftlockEvent::Batch(BatchEvent::Loaded { total: 3 })
		);
		assert_eq!(
			receiver2.recv().await.unwrap(),
			GiftlockEvent::Batch(BatchEvent::Loaded { total: 3 })
		);
	}

	#[test]
	fn test_publish_with_no_subscribers() {
		let event_bus = EventBus::new(10);
		let result = event_bus.publish(GiftlockEvent::Batch(BatchEvent::Cancelled));
		assert!(result.is_err());
	}

	#[test]
	fn test_event_bus_clone_shares_channel() {
		let event_bus1 = EventBus::new(10);
		let event_bus2 = event_bus1.clone();

		let _receiver1 = event_bus1.subscribe();
		let _receiver2 = event_bus2.subscribe();

		assert_eq!(event_bus1.sender.receiver_count(), 2);
		assert_eq!(event_bus2.sender.receiver_count(), 2);
	}

	#[tokio::test]
	async fn test_late_subscriber_misses_previous_events() {
		let event_bus = EventBus::new(10);
		let mut early = event_bus.subscribe();

		event_bus
			.publish(status_event("row-2", EntryStatus::Validating))
			.unwrap();
		early.recv().await.unwrap();

		let mut late = event_bus.subscribe();
		event_bus
			.publish(status_event("row-3", EntryStatus::Valid))
			.unwrap();

		let received = late.recv().await.unwrap();
		match received {
			GiftlockEvent::Entry(EntryEvent::StatusChanged { entry_id, .. }) => {
				assert_eq!(entry_id, "row-3");
			},
			other => panic!("unexpected event {:?}", other),
		}
	}
}
