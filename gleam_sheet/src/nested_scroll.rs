// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested-scroll arbitration between a sheet and scrollable content inside it.
//!
//! A scrollable child offers every drag delta and fling velocity to its
//! ancestors before (`pre_*`) and after (`post_*`) consuming its share. The
//! sheet only moves vertically; the `x` component is never consumed.
//!
//! Signs follow the sheet's offset axis: negative deltas move content up
//! (toward [`GleamValue::Expanded`](crate::GleamValue::Expanded)), positive
//! deltas move it down toward hiding.
//!
//! ```
//! use gleam_sheet::{GleamNestedScroll, GleamState, NestedScrollConnection, NestedScrollSource};
//! use kurbo::Vec2;
//!
//! let mut state = GleamState::builder().build().unwrap();
//! state.layout(800.0, 700.0);
//! state.show();
//! while state.advance(16.0) {}
//!
//! // Scrolling the list up first expands the sheet.
//! let mut scroll = GleamNestedScroll::new(&mut state);
//! let consumed = scroll.pre_scroll(Vec2::new(0.0, -50.0), NestedScrollSource::Drag);
//! assert_eq!(consumed, Vec2::new(0.0, -50.0));
//! assert_eq!(state.offset(), Some(350.0));
//! ```

use kurbo::Vec2;
use tracing::trace;

use crate::GleamState;

/// What produced a nested-scroll delta.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NestedScrollSource {
    /// Direct manipulation by the user.
    Drag,
    /// Momentum after a fling was released.
    Fling,
}

/// The ancestor side of the nested-scroll protocol.
///
/// Every method returns the part of `available` it consumed.
pub trait NestedScrollConnection {
    /// Offered before the child scrolls.
    fn pre_scroll(&mut self, available: Vec2, source: NestedScrollSource) -> Vec2 {
        let _ = (available, source);
        Vec2::ZERO
    }

    /// Offered what the child left over.
    fn post_scroll(&mut self, consumed: Vec2, available: Vec2, source: NestedScrollSource) -> Vec2 {
        let _ = (consumed, available, source);
        Vec2::ZERO
    }

    /// Offered a fling velocity before the child flings.
    fn pre_fling(&mut self, available: Vec2) -> Vec2 {
        let _ = available;
        Vec2::ZERO
    }

    /// Offered the velocity the child did not use.
    fn post_fling(&mut self, consumed: Vec2, available: Vec2) -> Vec2 {
        let _ = (consumed, available);
        Vec2::ZERO
    }
}

/// Connects a [`GleamState`] to the nested-scroll protocol.
#[derive(Debug)]
pub struct GleamNestedScroll<'a> {
    state: &'a mut GleamState,
}

impl<'a> GleamNestedScroll<'a> {
    /// Wraps `state` for one nested-scroll exchange.
    pub fn new(state: &'a mut GleamState) -> Self {
        Self { state }
    }

    /// The wrapped state.
    #[must_use]
    pub fn state(&self) -> &GleamState {
        self.state
    }
}

impl NestedScrollConnection for GleamNestedScroll<'_> {
    fn pre_scroll(&mut self, available: Vec2, source: NestedScrollSource) -> Vec2 {
        if available.y < 0.0 && source == NestedScrollSource::Drag {
            let consumed = self.state.dispatch_raw_delta(available.y);
            trace!(available = available.y, consumed, "sheet pre-scroll");
            Vec2::new(0.0, consumed)
        } else {
            Vec2::ZERO
        }
    }

    fn post_scroll(&mut self, _consumed: Vec2, available: Vec2, source: NestedScrollSource) -> Vec2 {
        if source == NestedScrollSource::Drag {
            let consumed = self.state.dispatch_raw_delta(available.y);
            trace!(available = available.y, consumed, "sheet post-scroll");
            Vec2::new(0.0, consumed)
        } else {
            Vec2::ZERO
        }
    }

    fn pre_fling(&mut self, available: Vec2) -> Vec2 {
        let velocity = available.y;
        let above_min = match (self.state.offset(), self.state.anchors().min_anchor()) {
            (Some(offset), Some(min)) => offset > min,
            _ => false,
        };
        if velocity < 0.0 && above_min && self.state.settle(velocity).is_ok() {
            available
        } else {
            Vec2::ZERO
        }
    }

    fn post_fling(&mut self, _consumed: Vec2, available: Vec2) -> Vec2 {
        if self.state.settle(available.y).is_ok() {
            available
        } else {
            Vec2::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::{GleamNestedScroll, NestedScrollConnection, NestedScrollSource};
    use crate::{GleamState, GleamValue};

    fn partially_expanded() -> GleamState {
        let mut state = GleamState::builder().build().unwrap();
        state.layout(800.0, 700.0);
        state.show();
        while state.advance(16.0) {}
        state
    }

    #[test]
    fn pre_scroll_takes_only_upward_drags() {
        let mut state = partially_expanded();
        let mut scroll = GleamNestedScroll::new(&mut state);
        assert_eq!(
            scroll.pre_scroll(Vec2::new(3.0, 40.0), NestedScrollSource::Drag),
            Vec2::ZERO
        );
        assert_eq!(
            scroll.pre_scroll(Vec2::new(0.0, -40.0), NestedScrollSource::Fling),
            Vec2::ZERO
        );
        // Only the part above the expanded anchor is consumed.
        assert_eq!(
            scroll.pre_scroll(Vec2::new(5.0, -500.0), NestedScrollSource::Drag),
            Vec2::new(0.0, -300.0)
        );
        assert_eq!(state.offset(), Some(100.0));
    }

    #[test]
    fn post_scroll_moves_sheet_with_leftover_drag() {
        let mut state = partially_expanded();
        let mut scroll = GleamNestedScroll::new(&mut state);
        let consumed = scroll.post_scroll(
            Vec2::ZERO,
            Vec2::new(0.0, 30.0),
            NestedScrollSource::Drag,
        );
        assert_eq!(consumed, Vec2::new(0.0, 30.0));
        assert_eq!(
            scroll.post_scroll(Vec2::ZERO, Vec2::new(0.0, 30.0), NestedScrollSource::Fling),
            Vec2::ZERO
        );
        assert_eq!(scroll.state().offset(), Some(430.0));
    }

    #[test]
    fn pre_fling_intercepts_upward_fling_above_min_anchor() {
        let mut state = partially_expanded();
        state.dispatch_raw_delta(-30.0);
        let mut scroll = GleamNestedScroll::new(&mut state);
        let available = Vec2::new(0.0, -900.0);
        assert_eq!(scroll.pre_fling(available), available);
        assert_eq!(state.target_value(), GleamValue::Expanded);
        while state.advance(16.0) {}

        // At the minimum anchor the inner content gets the fling.
        let mut scroll = GleamNestedScroll::new(&mut state);
        assert_eq!(scroll.pre_fling(available), Vec2::ZERO);
        assert_eq!(scroll.pre_fling(Vec2::new(0.0, 900.0)), Vec2::ZERO);
    }

    #[test]
    fn post_fling_settles_with_leftover_velocity() {
        let mut state = partially_expanded();
        state.dispatch_raw_delta(20.0);
        let mut scroll = GleamNestedScroll::new(&mut state);
        let available = Vec2::new(0.0, 2_000.0);
        assert_eq!(scroll.post_fling(Vec2::ZERO, available), available);
        assert_eq!(state.target_value(), GleamValue::Hidden);
    }

    #[test]
    fn post_fling_at_rest_leaves_sheet_in_place() {
        let mut state = partially_expanded();
        let mut scroll = GleamNestedScroll::new(&mut state);
        scroll.post_fling(Vec2::ZERO, Vec2::new(0.0, 2_000.0));
        assert!(!state.is_animation_running());
        while state.advance(16.0) {}
        assert_eq!(state.current_value(), GleamValue::PartiallyExpanded);
        assert_eq!(state.offset(), Some(400.0));
    }

    #[test]
    fn nothing_is_consumed_before_layout() {
        let mut state = GleamState::builder().build().unwrap();
        let mut scroll = GleamNestedScroll::new(&mut state);
        assert_eq!(
            scroll.pre_scroll(Vec2::new(0.0, -10.0), NestedScrollSource::Drag),
            Vec2::ZERO
        );
        assert_eq!(scroll.pre_fling(Vec2::new(0.0, -10.0)), Vec2::ZERO);
        assert_eq!(scroll.post_fling(Vec2::ZERO, Vec2::new(0.0, 10.0)), Vec2::ZERO);
    }
}
