// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bridge between a back stack and the visibility of one sheet.
//!
//! ## Rules
//!
//! - Every observed back-stack change first hides the sheet. The hide is
//!   animated when the longer of the previous and the new stack has an entry
//!   beneath its top; otherwise it is forced (no animation).
//! - The retained entry, whose content is on screen, switches to the new top
//!   only once that hide has finished. Cancellation of the bridge's own hide
//!   counts as finished.
//! - A newly retained entry is shown.
//! - When the sheet becomes visible, every in-progress transition is marked
//!   complete. A show that finishes on a sheet that never left the screen
//!   (its hide was vetoed) counts the same.
//! - Once the retained entry has switched, popped entries still marked in
//!   progress are complete.
//! - When the sheet becomes hidden, an in-progress transition of the retained
//!   entry is marked complete. Without one, and unless the bridge's own hide
//!   caused it, the user dismissed the sheet and the entry is popped without
//!   transition.
//!
//! A replace (`[A]` to `[B]`) takes the forced path: A disappears without
//! animation before B animates in. A push onto an open sheet (`[A]` to
//! `[A, B]`) plays A's hide before B shows.

use alloc::vec::Vec;

use gleam_sheet::{GleamState, GleamValue, Transition, TransitionStatus};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{BackStackController, BackStackEntry};

/// Side effects reported by [`GleamContentHost::update`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContentHostEvent {
    /// The entry whose content is displayed changed.
    RetainedChanged(Option<BackStackEntry>),
    /// The sheet became visible showing `entry`.
    SheetShown(BackStackEntry),
    /// The sheet became hidden while showing `entry`.
    SheetDismissed {
        /// The retained entry at the time.
        entry: BackStackEntry,
        /// `true` if the user dismissed the sheet and the entry was popped.
        by_user: bool,
    },
}

/// A hide issued for a back-stack change, and the entry to retain after it.
#[derive(Debug)]
struct PendingSwap {
    /// `None` when the sheet could not hide at all.
    hide: Option<Transition>,
    next: Option<BackStackEntry>,
}

/// Keeps one sheet's visibility in step with a back stack.
#[derive(Debug, Default)]
pub struct GleamContentHost {
    observed: Vec<BackStackEntry>,
    retained: Option<BackStackEntry>,
    pending: Option<PendingSwap>,
    showing: Option<(BackStackEntry, Transition)>,
    was_visible: bool,
}

impl GleamContentHost {
    /// Creates a host that has observed an empty back stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry whose content is displayed.
    #[must_use]
    pub fn retained_entry(&self) -> Option<BackStackEntry> {
        self.retained
    }

    /// Returns `true` while a bridge hide is waiting to finish.
    #[must_use]
    pub fn is_swapping(&self) -> bool {
        self.pending.is_some()
    }

    /// Reconciles the sheet with `controller`'s back stack.
    ///
    /// Call after every back-stack change and every sheet frame.
    pub fn update<C: BackStackController + ?Sized>(
        &mut self,
        state: &mut GleamState,
        controller: &mut C,
    ) -> SmallVec<[ContentHostEvent; 4]> {
        let mut events = SmallVec::new();

        if controller.back_stack() != self.observed.as_slice() {
            self.on_back_stack_changed(state, controller.back_stack());
        }

        self.on_visibility(state, controller, &mut events);
        // A user dismissal pops its entry; follow that change right away.
        if controller.back_stack() != self.observed.as_slice() {
            self.on_back_stack_changed(state, controller.back_stack());
        }

        let hide_finished = self.pending.as_ref().is_some_and(|pending| {
            pending
                .hide
                .as_ref()
                .is_none_or(Transition::is_finished)
        });
        if hide_finished && let Some(PendingSwap { next, .. }) = self.pending.take() {
            let back_stack = controller.back_stack().to_vec();
            complete_transitions(controller, |entry| !back_stack.contains(entry));
            let changed = next != self.retained;
            if changed {
                debug!(entry = ?next.map(|e| e.id), "retained entry changed");
                self.retained = next;
                events.push(ContentHostEvent::RetainedChanged(next));
            }
            if let Some(entry) = next
                && (changed || state.target_value() == GleamValue::Hidden)
            {
                self.showing = Some((entry, state.show()));
            }
        }
        self.on_show_finished(state, controller, &mut events);

        events
    }

    /// Handles a show that finished without a hidden to visible edge.
    fn on_show_finished<C: BackStackController + ?Sized>(
        &mut self,
        state: &GleamState,
        controller: &mut C,
        events: &mut SmallVec<[ContentHostEvent; 4]>,
    ) {
        let Some((entry, show)) = self.showing.take_if(|(_, show)| show.is_finished()) else {
            return;
        };
        if show.status() == TransitionStatus::Completed
            && state.is_visible()
            && self.retained == Some(entry)
        {
            debug!(entry = entry.id.0, "sheet shown without leaving the screen");
            complete_transitions(controller, |_| true);
            events.push(ContentHostEvent::SheetShown(entry));
        }
    }

    fn on_back_stack_changed(&mut self, state: &mut GleamState, back_stack: &[BackStackEntry]) {
        let animated = self.observed.len().max(back_stack.len()) >= 2;
        debug!(
            from = self.observed.len(),
            to = back_stack.len(),
            animated,
            "back stack changed; hiding sheet"
        );
        let hide = if animated {
            state.hide()
        } else {
            state.forced_hide()
        };
        let next = back_stack.last().copied();
        self.observed.clear();
        self.observed.extend_from_slice(back_stack);
        let hide = hide
            .inspect_err(|err| warn!(%err, "sheet cannot hide; swapping content immediately"))
            .ok();
        self.pending = Some(PendingSwap { hide, next });
    }

    fn on_visibility<C: BackStackController + ?Sized>(
        &mut self,
        state: &GleamState,
        controller: &mut C,
        events: &mut SmallVec<[ContentHostEvent; 4]>,
    ) {
        let visible = state.is_visible();
        if visible == self.was_visible {
            return;
        }
        self.was_visible = visible;

        if visible {
            self.showing = None;
            complete_transitions(controller, |_| true);
            if let Some(entry) = self.retained {
                debug!(entry = entry.id.0, "sheet shown");
                events.push(ContentHostEvent::SheetShown(entry));
            }
            return;
        }

        let Some(entry) = self.retained else {
            return;
        };
        let by_user = if controller.transitions_in_progress().contains(&entry) {
            controller.mark_transition_complete(entry);
            false
        } else if self.pending.is_some() {
            false
        } else {
            debug!(entry = entry.id.0, "sheet dismissed by user; popping");
            controller.pop(entry, false);
            true
        };
        events.push(ContentHostEvent::SheetDismissed { entry, by_user });
    }
}

/// Marks every in-progress transition accepted by `done_if` complete.
fn complete_transitions<C: BackStackController + ?Sized>(
    controller: &mut C,
    done_if: impl Fn(&BackStackEntry) -> bool,
) {
    let done: SmallVec<[BackStackEntry; 4]> = controller
        .transitions_in_progress()
        .iter()
        .filter(|entry| done_if(*entry))
        .copied()
        .collect();
    for entry in done {
        controller.mark_transition_complete(entry);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use gleam_sheet::{GleamState, GleamValue};

    use super::{ContentHostEvent, GleamContentHost};
    use crate::{BackStack, BackStackController, BackStackEntry, DestinationId, EntryId};

    const A: BackStackEntry = BackStackEntry::new(EntryId(1), DestinationId(1));
    const B: BackStackEntry = BackStackEntry::new(EntryId(2), DestinationId(2));

    struct Harness {
        host: GleamContentHost,
        state: GleamState,
        stack: BackStack,
    }

    impl Harness {
        fn new() -> Self {
            let mut state = GleamState::builder().build().unwrap();
            state.layout(800.0, 300.0);
            Self {
                host: GleamContentHost::new(),
                state,
                stack: BackStack::new(),
            }
        }

        fn update(&mut self) -> Vec<ContentHostEvent> {
            self.host.update(&mut self.state, &mut self.stack).to_vec()
        }

        fn run(&mut self) -> Vec<ContentHostEvent> {
            let mut events = Vec::new();
            for _ in 0..1_000 {
                let running = self.state.advance(16.0);
                events.extend(self.update());
                if !running && !self.host.is_swapping() && !self.state.is_animation_running() {
                    return events;
                }
            }
            panic!("bridge never settled");
        }

        fn shown_with(entries: &[BackStackEntry]) -> Self {
            let mut h = Self::new();
            for entry in entries {
                h.stack.push_with_transition(*entry);
                h.update();
                h.run();
            }
            assert!(h.state.is_visible());
            assert!(h.stack.transitions_in_progress().is_empty());
            h
        }
    }

    #[test]
    fn first_entry_is_shown_and_its_transition_completed() {
        let mut h = Harness::new();
        h.stack.push_with_transition(A);
        assert_eq!(h.update(), [ContentHostEvent::RetainedChanged(Some(A))]);
        assert_eq!(h.state.target_value(), GleamValue::Expanded);
        assert_eq!(h.stack.transitions_in_progress(), &[A]);
        assert_eq!(h.run(), [ContentHostEvent::SheetShown(A)]);
        assert!(h.stack.transitions_in_progress().is_empty());
    }

    #[test]
    fn pop_to_previous_entry_hides_animated_before_swapping() {
        let mut h = Harness::shown_with(&[A, B]);
        assert_eq!(h.host.retained_entry(), Some(B));

        h.stack.pop_with_transition(B, false);
        assert!(h.update().is_empty());
        assert_eq!(h.state.target_value(), GleamValue::Hidden);
        assert!(h.state.is_animation_running());
        assert_eq!(h.host.retained_entry(), Some(B));

        let events = h.run();
        assert_eq!(
            &events[..2],
            &[
                ContentHostEvent::SheetDismissed {
                    entry: B,
                    by_user: false
                },
                ContentHostEvent::RetainedChanged(Some(A)),
            ]
        );
        assert_eq!(events.last(), Some(&ContentHostEvent::SheetShown(A)));
        assert!(h.stack.transitions_in_progress().is_empty());
    }

    #[test]
    fn emptying_the_stack_forces_the_hide() {
        let mut h = Harness::shown_with(&[A]);
        h.stack.pop_with_transition(A, false);
        let events = h.update();
        assert!(!h.state.is_visible());
        assert!(!h.state.is_animation_running());
        assert_eq!(h.state.offset(), Some(800.0));
        assert_eq!(
            events,
            [
                ContentHostEvent::SheetDismissed {
                    entry: A,
                    by_user: false
                },
                ContentHostEvent::RetainedChanged(None),
            ]
        );
        assert!(h.stack.transitions_in_progress().is_empty());
    }

    #[test]
    fn user_dismissal_pops_without_transition() {
        let mut h = Harness::shown_with(&[A]);
        h.state.hide().unwrap();
        let events = h.run();
        assert_eq!(
            events,
            [
                ContentHostEvent::SheetDismissed {
                    entry: A,
                    by_user: true
                },
                ContentHostEvent::RetainedChanged(None),
            ]
        );
        assert!(h.stack.back_stack().is_empty());
        assert!(h.stack.transitions_in_progress().is_empty());
        assert!(h.update().is_empty());
    }

    #[test]
    fn push_onto_open_sheet_is_not_a_dismissal() {
        let mut h = Harness::shown_with(&[A]);
        h.stack.push_with_transition(B);
        h.update();
        assert!(h.state.is_animation_running());
        let events = h.run();
        assert!(events.contains(&ContentHostEvent::SheetDismissed {
            entry: A,
            by_user: false
        }));
        assert_eq!(h.stack.back_stack(), &[A, B]);
        assert_eq!(h.host.retained_entry(), Some(B));
        assert!(h.state.is_visible());
    }

    #[test]
    fn replace_hides_without_animation_then_shows() {
        let mut h = Harness::shown_with(&[A]);
        h.stack.pop(A, false);
        h.stack.push_with_transition(B);
        let events = h.update();
        assert_eq!(events.last(), Some(&ContentHostEvent::RetainedChanged(Some(B))));
        assert_eq!(h.state.target_value(), GleamValue::Expanded);
        assert_eq!(h.state.offset(), Some(800.0));
        h.run();
        assert!(h.stack.transitions_in_progress().is_empty());
    }

    #[test]
    fn vetoed_hide_still_completes_transitions() {
        let mut state = GleamState::builder()
            .confirm_value_change(|value| value != GleamValue::Hidden)
            .build()
            .unwrap();
        state.layout(800.0, 300.0);
        let mut h = Harness {
            host: GleamContentHost::new(),
            state,
            stack: BackStack::new(),
        };
        h.stack.push_with_transition(A);
        h.update();
        h.run();
        assert!(h.stack.transitions_in_progress().is_empty());

        h.stack.push_with_transition(B);
        assert_eq!(
            h.update(),
            [
                ContentHostEvent::RetainedChanged(Some(B)),
                ContentHostEvent::SheetShown(B),
            ]
        );
        assert!(h.stack.transitions_in_progress().is_empty());

        h.stack.pop_with_transition(B, false);
        assert_eq!(
            h.update(),
            [
                ContentHostEvent::RetainedChanged(Some(A)),
                ContentHostEvent::SheetShown(A),
            ]
        );
        assert!(h.state.is_visible());
        assert!(h.stack.transitions_in_progress().is_empty());
    }

    #[test]
    fn cancelled_bridge_hide_still_swaps() {
        let mut h = Harness::shown_with(&[A]);
        h.stack.push_with_transition(B);
        h.update();
        h.state.advance(16.0);
        h.state.drag_started();
        let events = h.update();
        assert_eq!(events, [ContentHostEvent::RetainedChanged(Some(B))]);
        assert!(!h.host.is_swapping());
    }
}
