// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Back-stack entries and the controller the navigator talks to.

use alloc::vec::Vec;

use smallvec::SmallVec;
use tracing::trace;

/// Identity of one back-stack entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub u64);

/// Identity of a registered sheet destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DestinationId(pub u32);

/// One entry of a navigation back stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BackStackEntry {
    /// Unique entry identity.
    pub id: EntryId,
    /// The destination this entry shows.
    pub destination: DestinationId,
}

impl BackStackEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(id: EntryId, destination: DestinationId) -> Self {
        Self { id, destination }
    }
}

/// The navigation state a [`GleamNavigator`](crate::GleamNavigator) is attached to.
///
/// Pops remove `entry` and everything above it.
pub trait BackStackController {
    /// Entries from bottom to top.
    fn back_stack(&self) -> &[BackStackEntry];

    /// Entries whose enter or exit transition has not been marked complete.
    fn transitions_in_progress(&self) -> &[BackStackEntry];

    /// Pushes `entry` and records its enter transition as in progress.
    fn push_with_transition(&mut self, entry: BackStackEntry);

    /// Pops up to `entry` and records its exit transition as in progress.
    fn pop_with_transition(&mut self, entry: BackStackEntry, save_state: bool);

    /// Pops up to `entry` without a transition.
    fn pop(&mut self, entry: BackStackEntry, save_state: bool);

    /// Marks the transition of `entry` complete.
    fn mark_transition_complete(&mut self, entry: BackStackEntry);
}

/// In-memory [`BackStackController`].
#[derive(Clone, Debug, Default)]
pub struct BackStack {
    entries: Vec<BackStackEntry>,
    in_progress: SmallVec<[BackStackEntry; 2]>,
    saved: Vec<BackStackEntry>,
}

impl BackStack {
    /// Creates an empty back stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries popped with `save_state`, oldest first.
    #[must_use]
    pub fn saved_entries(&self) -> &[BackStackEntry] {
        &self.saved
    }

    /// Removes `entry` and everything above it. Returns `false` if absent.
    fn pop_up_to(&mut self, entry: BackStackEntry, save_state: bool) -> bool {
        let Some(index) = self.entries.iter().position(|e| *e == entry) else {
            return false;
        };
        let popped = self.entries.split_off(index);
        self.in_progress
            .retain(|e| !popped.contains(e) || *e == entry);
        if save_state {
            self.saved.extend(popped);
        }
        true
    }
}

impl BackStackController for BackStack {
    fn back_stack(&self) -> &[BackStackEntry] {
        &self.entries
    }

    fn transitions_in_progress(&self) -> &[BackStackEntry] {
        &self.in_progress
    }

    fn push_with_transition(&mut self, entry: BackStackEntry) {
        trace!(entry = entry.id.0, "push");
        self.entries.push(entry);
        if !self.in_progress.contains(&entry) {
            self.in_progress.push(entry);
        }
    }

    fn pop_with_transition(&mut self, entry: BackStackEntry, save_state: bool) {
        trace!(entry = entry.id.0, save_state, "pop with transition");
        if self.pop_up_to(entry, save_state) && !self.in_progress.contains(&entry) {
            self.in_progress.push(entry);
        }
    }

    fn pop(&mut self, entry: BackStackEntry, save_state: bool) {
        trace!(entry = entry.id.0, save_state, "pop");
        if self.pop_up_to(entry, save_state) {
            self.in_progress.retain(|e| *e != entry);
        }
    }

    fn mark_transition_complete(&mut self, entry: BackStackEntry) {
        self.in_progress.retain(|e| *e != entry);
    }
}

#[cfg(test)]
mod tests {
    use super::{BackStack, BackStackController, BackStackEntry, DestinationId, EntryId};

    fn entry(id: u64) -> BackStackEntry {
        BackStackEntry::new(EntryId(id), DestinationId(0))
    }

    #[test]
    fn push_and_pop_track_transitions() {
        let mut stack = BackStack::new();
        stack.push_with_transition(entry(1));
        stack.push_with_transition(entry(2));
        assert_eq!(stack.transitions_in_progress(), &[entry(1), entry(2)]);
        stack.mark_transition_complete(entry(1));
        stack.mark_transition_complete(entry(2));

        stack.pop_with_transition(entry(2), false);
        assert_eq!(stack.back_stack(), &[entry(1)]);
        assert_eq!(stack.transitions_in_progress(), &[entry(2)]);
    }

    #[test]
    fn pop_removes_everything_above() {
        let mut stack = BackStack::new();
        for id in 1..=3 {
            stack.push_with_transition(entry(id));
        }
        stack.pop(entry(2), true);
        assert_eq!(stack.back_stack(), &[entry(1)]);
        assert_eq!(stack.transitions_in_progress(), &[entry(1)]);
        assert_eq!(stack.saved_entries(), &[entry(2), entry(3)]);

        // Unknown entries are ignored.
        stack.pop_with_transition(entry(9), false);
        assert_eq!(stack.back_stack(), &[entry(1)]);
        assert_eq!(stack.transitions_in_progress(), &[entry(1)]);
    }
}
