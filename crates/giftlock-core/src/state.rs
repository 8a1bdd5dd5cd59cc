//! Entry state machine implementation.
//!
//! Manages batch entry state transitions with validation, ensuring entries
//! move through valid lifecycle states:
//! Pending -> Validating -> {Valid | Invalid}, Valid -> Sending -> {Sent | Failed}.

use giftlock_types::{BulkEntry, EntryStatus};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during entry state management.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
	#[error("Invalid state transition for {id}: {from} -> {to}")]
	InvalidTransition {
		id: String,
		from: EntryStatus,
		to: EntryStatus,
	},
}

/// Static transition table - each state maps to allowed next states.
static TRANSITIONS: Lazy<HashMap<EntryStatus, HashSet<EntryStatus>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		EntryStatus::Pending,
		HashSet::from([EntryStatus::Validating]),
	);
	m.insert(
		EntryStatus::Validating,
		HashSet::from([EntryStatus::Valid, EntryStatus::Invalid]),
	);
	m.insert(EntryStatus::Valid, HashSet::from([EntryStatus::Sending]));
	m.insert(
		EntryStatus::Sending,
		HashSet::from([EntryStatus::Sent, EntryStatus::Failed]),
	);
	m.insert(EntryStatus::Invalid, HashSet::new()); // terminal
	m.insert(EntryStatus::Sent, HashSet::new()); // terminal
	m.insert(EntryStatus::Failed, HashSet::new()); // terminal
	m
});

/// Checks if a state transition is valid.
pub fn is_valid_transition(from: EntryStatus, to: EntryStatus) -> bool {
	TRANSITIONS
		.get(&from)
		.is_some_and(|set| set.contains(&to))
}

/// Transitions an entry to a new status with validation.
///
/// The entry is untouched when the transition is not allowed, so a failed
/// transition can never corrupt batch bookkeeping.
pub fn transition_entry(entry: &mut BulkEntry, to: EntryStatus) -> Result<(), StateError> {
	if !is_valid_transition(entry.status, to) {
		return Err(StateError::InvalidTransition {
			id: entry.id.clone(),
			from: entry.status,
			to,
		});
	}
	entry.status = to;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use giftlock_types::utils::tests::builders::BulkEntryBuilder;

	const ALL: [EntryStatus; 7] = [
		EntryStatus::Pending,
		EntryStatus::Validating,
		EntryStatus::Valid,
		EntryStatus::Invalid,
		EntryStatus::Sending,
		EntryStatus::Sent,
		EntryStatus::Failed,
	];

	#[test]
	fn test_happy_path_transitions() {
		let mut entry = BulkEntryBuilder::new().row(2).build();
		for status in [
			EntryStatus::Validating,
			EntryStatus::Valid,
			EntryStatus::Sending,
			EntryStatus::Sent,
		] {
			transition_entry(&mut entry, status).unwrap();
			assert_eq!(entry.status, status);
		}
	}

	#[test]
	fn test_invalid_jumps_rejected() {
		assert!(!is_valid_transition(EntryStatus::Pending, EntryStatus::Valid));
		assert!(!is_valid_transition(EntryStatus::Pending, EntryStatus::Sending));
		assert!(!is_valid_transition(EntryStatus::Valid, EntryStatus::Sent));
		assert!(!is_valid_transition(
			EntryStatus::Invalid,
			EntryStatus::Sending
		));
	}

	#[test]
	fn test_terminal_states_have_no_exits() {
		for from in [EntryStatus::Invalid, EntryStatus::Sent, EntryStatus::Failed] {
			for to in ALL {
				assert!(
					!is_valid_transition(from, to),
					"{:?} -> {:?} should be rejected",
					from,
					to
				);
			}
		}
	}

	#[test]
	fn test_terminal_table_matches_status_flag() {
		for status in ALL {
			let has_exit = ALL.iter().any(|&to| is_valid_transition(status, to));
			assert_eq!(has_exit, !status.is_terminal(), "{:?}", status);
		}
	}

	#[test]
	fn test_failed_transition_leaves_entry_untouched() {
		let mut entry = BulkEntryBuilder::new()
			.row(2)
			.status(EntryStatus::Sent)
			.build();
		let err = transition_entry(&mut entry, EntryStatus::Sending).unwrap_err();
		assert!(matches!(err, StateError::InvalidTransition { .. }));
		assert_eq!(entry.status, EntryStatus::Sent);
	}
}
