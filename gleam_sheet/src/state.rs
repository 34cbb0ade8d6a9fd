// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag/animation state machine of one sheet.
//!
//! ## Usage
//!
//! 1) Build a [`GleamState`] with [`GleamState::builder`].
//! 2) On every layout pass call [`GleamState::layout`] with the container and
//!    content heights. Anchors are recomputed and the state retargets if its
//!    target lost its anchor.
//! 3) Drive transitions with [`GleamState::show`], [`GleamState::hide`],
//!    [`GleamState::expand`], [`GleamState::partial_expand`] or gestures
//!    ([`GleamState::drag_started`], [`GleamState::dispatch_raw_delta`],
//!    [`GleamState::drag_stopped`]).
//! 4) Call [`GleamState::advance`] once per frame and read
//!    [`GleamState::offset`].
//!
//! ## Minimal example
//!
//! ```
//! use gleam_sheet::{GleamState, GleamValue, TransitionStatus};
//!
//! let mut state = GleamState::builder().build().unwrap();
//! state.layout(800.0, 600.0);
//! assert_eq!(state.offset(), Some(800.0));
//!
//! // Tall content: showing rests at the partial anchor first.
//! let show = state.show();
//! assert_eq!(state.target_value(), GleamValue::PartiallyExpanded);
//! while state.advance(16.0) {}
//! assert_eq!(show.status(), TransitionStatus::Completed);
//! assert_eq!(state.current_value(), GleamValue::PartiallyExpanded);
//! assert_eq!(state.offset(), Some(400.0));
//! ```

use alloc::boxed::Box;
use core::fmt;

use tracing::{debug, trace, warn};

use crate::{
    AnimationSpec, Density, DraggableAnchors, GleamError, GleamValue, ScalarAnimation, Transition,
    TransitionStatus, compute_anchors,
};

/// Distance a drag must travel past its origin anchor before releasing without
/// a fling moves to the next anchor.
pub const POSITIONAL_THRESHOLD_DP: f64 = 56.0;

/// Release velocity (units per second) that commits to the next anchor in the
/// fling direction regardless of position.
pub const VELOCITY_THRESHOLD_DP: f64 = 125.0;

/// Veto predicate consulted before committing to a new value.
pub type ConfirmValueChange = Box<dyn Fn(GleamValue) -> bool>;

const SHOW_PREFERENCE: [GleamValue; 2] = [GleamValue::PartiallyExpanded, GleamValue::Expanded];
const RETARGET_PREFERENCE: [GleamValue; 3] = [
    GleamValue::PartiallyExpanded,
    GleamValue::Expanded,
    GleamValue::Hidden,
];

/// Builder for [`GleamState`].
pub struct GleamStateBuilder {
    initial_value: GleamValue,
    skip_partially_expanded: bool,
    skip_hidden_state: bool,
    confirm_value_change: Option<ConfirmValueChange>,
    density: Density,
    animation_spec: AnimationSpec,
}

impl GleamStateBuilder {
    /// Value the sheet starts at. Defaults to [`GleamValue::Hidden`].
    #[must_use]
    pub fn initial_value(mut self, value: GleamValue) -> Self {
        self.initial_value = value;
        self
    }

    /// Restores a value previously returned by [`GleamState::save`].
    ///
    /// Offsets and anchors are never persisted; they are recomputed on the
    /// next layout pass.
    #[must_use]
    pub fn restore(self, saved: GleamValue) -> Self {
        self.initial_value(saved)
    }

    /// Excludes [`GleamValue::PartiallyExpanded`] from the anchor set.
    #[must_use]
    pub fn skip_partially_expanded(mut self, skip: bool) -> Self {
        self.skip_partially_expanded = skip;
        self
    }

    /// Excludes [`GleamValue::Hidden`] from the anchor set.
    #[must_use]
    pub fn skip_hidden_state(mut self, skip: bool) -> Self {
        self.skip_hidden_state = skip;
        self
    }

    /// Installs a veto predicate consulted before every value change.
    #[must_use]
    pub fn confirm_value_change(mut self, confirm: impl Fn(GleamValue) -> bool + 'static) -> Self {
        self.confirm_value_change = Some(Box::new(confirm));
        self
    }

    /// Pixel density used to convert the settle thresholds.
    #[must_use]
    pub fn density(mut self, density: Density) -> Self {
        self.density = density;
        self
    }

    /// Animation used by animated transitions.
    #[must_use]
    pub fn animation_spec(mut self, spec: AnimationSpec) -> Self {
        self.animation_spec = spec;
        self
    }

    /// Builds the state.
    ///
    /// Fails when the initial value is excluded by a skip flag.
    pub fn build(self) -> Result<GleamState, GleamError> {
        let conflicts = (self.skip_partially_expanded
            && self.initial_value == GleamValue::PartiallyExpanded)
            || (self.skip_hidden_state && self.initial_value == GleamValue::Hidden);
        if conflicts {
            warn!(value = %self.initial_value, "initial sheet value conflicts with skip flags");
            return Err(GleamError::InitialValueConflict {
                value: self.initial_value,
            });
        }
        Ok(GleamState {
            current_value: self.initial_value,
            anchors: DraggableAnchors::new(),
            offset: None,
            last_velocity: 0.0,
            skip_partially_expanded: self.skip_partially_expanded,
            skip_hidden_state: self.skip_hidden_state,
            confirm_value_change: self.confirm_value_change,
            density: self.density,
            animation_spec: self.animation_spec,
            positional_threshold: self.density.dp_to_px(POSITIONAL_THRESHOLD_DP),
            velocity_threshold: self.density.dp_to_px(VELOCITY_THRESHOLD_DP),
            in_flight: None,
            dragging: false,
        })
    }
}

impl Default for GleamStateBuilder {
    fn default() -> Self {
        Self {
            initial_value: GleamValue::Hidden,
            skip_partially_expanded: false,
            skip_hidden_state: false,
            confirm_value_change: None,
            density: Density::IDENTITY,
            animation_spec: AnimationSpec::default(),
        }
    }
}

impl fmt::Debug for GleamStateBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GleamStateBuilder")
            .field("initial_value", &self.initial_value)
            .field("skip_partially_expanded", &self.skip_partially_expanded)
            .field("skip_hidden_state", &self.skip_hidden_state)
            .field(
                "confirm_value_change",
                &self.confirm_value_change.as_ref().map(|_| "Fn"),
            )
            .field("density", &self.density)
            .field("animation_spec", &self.animation_spec)
            .finish()
    }
}

/// The running transition, if any.
#[derive(Debug)]
struct InFlight {
    transition: Transition,
    /// `None` while waiting for the target to get an anchor.
    animation: Option<ScalarAnimation>,
    /// A `show()` issued before its target was known; resolved on layout.
    resolve_show: bool,
    velocity: f64,
}

/// Drag/animation state machine for one sheet.
///
/// See the [module docs](self) for the call sequence. All positions are in
/// pixels from the top of the container.
pub struct GleamState {
    current_value: GleamValue,
    anchors: DraggableAnchors,
    offset: Option<f64>,
    last_velocity: f64,
    skip_partially_expanded: bool,
    skip_hidden_state: bool,
    confirm_value_change: Option<ConfirmValueChange>,
    density: Density,
    animation_spec: AnimationSpec,
    positional_threshold: f64,
    velocity_threshold: f64,
    in_flight: Option<InFlight>,
    dragging: bool,
}

impl fmt::Debug for GleamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GleamState")
            .field("current_value", &self.current_value)
            .field("target_value", &self.target_value())
            .field("offset", &self.offset)
            .field("anchors", &self.anchors)
            .field("in_flight", &self.in_flight)
            .field("dragging", &self.dragging)
            .finish_non_exhaustive()
    }
}

impl GleamState {
    /// Starts building a state.
    #[must_use]
    pub fn builder() -> GleamStateBuilder {
        GleamStateBuilder::default()
    }

    /// The settled value. Only changes when a transition completes or snaps.
    #[must_use]
    pub fn current_value(&self) -> GleamValue {
        self.current_value
    }

    /// The value the sheet is heading to.
    ///
    /// This is the in-flight transition's target, or during a drag the value
    /// a release without velocity would settle at.
    #[must_use]
    pub fn target_value(&self) -> GleamValue {
        if let Some(in_flight) = &self.in_flight {
            return in_flight.transition.target();
        }
        match self.offset {
            Some(offset) if !self.anchors.is_empty() => {
                self.compute_target(offset, self.current_value, 0.0)
            }
            _ => self.current_value,
        }
    }

    /// Current offset, or `None` before the first layout.
    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        self.offset
    }

    /// Current offset, failing before the first layout.
    pub fn require_offset(&self) -> Result<f64, GleamError> {
        self.offset.ok_or(GleamError::OffsetUnavailable)
    }

    /// Returns `true` unless the sheet is settled at [`GleamValue::Hidden`].
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.current_value != GleamValue::Hidden
    }

    /// Returns `true` if the current layout has an expanded anchor.
    #[must_use]
    pub fn has_expanded_state(&self) -> bool {
        self.anchors.has_anchor_for(GleamValue::Expanded)
    }

    /// Returns `true` if the current layout has a partially expanded anchor.
    #[must_use]
    pub fn has_partially_expanded_state(&self) -> bool {
        self.anchors.has_anchor_for(GleamValue::PartiallyExpanded)
    }

    /// Whether the partially expanded state is administratively excluded.
    #[must_use]
    pub fn skip_partially_expanded(&self) -> bool {
        self.skip_partially_expanded
    }

    /// Whether the hidden state is administratively excluded.
    #[must_use]
    pub fn skip_hidden_state(&self) -> bool {
        self.skip_hidden_state
    }

    /// Anchors registered by the latest layout pass.
    #[must_use]
    pub fn anchors(&self) -> &DraggableAnchors {
        &self.anchors
    }

    /// Density the thresholds were converted with.
    #[must_use]
    pub fn density(&self) -> Density {
        self.density
    }

    /// Velocity of the latest frame or release, in pixels per second.
    #[must_use]
    pub fn last_velocity(&self) -> f64 {
        self.last_velocity
    }

    /// Returns `true` while an animation is actually moving the offset.
    #[must_use]
    pub fn is_animation_running(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.animation.is_some())
    }

    /// Returns `true` between [`GleamState::drag_started`] and the release.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Handle to the in-flight transition, if any.
    #[must_use]
    pub fn transition(&self) -> Option<Transition> {
        self.in_flight
            .as_ref()
            .map(|in_flight| in_flight.transition.clone())
    }

    /// The value to persist across recreation.
    #[must_use]
    pub fn save(&self) -> GleamValue {
        self.current_value
    }

    /// Asks the veto predicate whether `value` may become the new value.
    #[must_use]
    pub fn confirm_value_change(&self, value: GleamValue) -> bool {
        self.confirm_value_change
            .as_ref()
            .is_none_or(|confirm| confirm(value))
    }

    /// Recomputes anchors for a layout pass.
    pub fn layout(&mut self, container_height: f64, content_height: f64) {
        let anchors = compute_anchors(
            container_height,
            content_height,
            self.skip_partially_expanded,
            self.skip_hidden_state,
        );
        self.update_anchors(anchors);
    }

    /// Installs a new anchor set and retargets.
    ///
    /// If the previous target lost its anchor, the new target is the first of
    /// `PartiallyExpanded`, `Expanded`, `Hidden` that has one. A running
    /// animation is redirected to the new target position; otherwise the
    /// offset snaps there.
    pub fn update_anchors(&mut self, anchors: DraggableAnchors) {
        if anchors == self.anchors && self.offset.is_some() {
            return;
        }
        let previous_target = self
            .in_flight
            .as_ref()
            .map_or(self.current_value, |in_flight| in_flight.transition.target());
        self.anchors = anchors;

        let resolve_show = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.resolve_show);
        let new_target = if resolve_show {
            self.anchors
                .first_available(&SHOW_PREFERENCE)
                .unwrap_or(previous_target)
        } else if self.anchors.has_anchor_for(previous_target) {
            previous_target
        } else {
            self.anchors
                .first_available(&RETARGET_PREFERENCE)
                .unwrap_or(previous_target)
        };
        if new_target != previous_target {
            debug!(from = %previous_target, to = %new_target, "sheet retargeted after anchor change");
        }

        let Some(to) = self.anchors.position_of(new_target) else {
            if let Some(in_flight) = &mut self.in_flight {
                // Wait for a layout that gives the target an anchor.
                in_flight.animation = None;
            } else if let Some(offset) = self.offset {
                self.offset = Some(self.anchors.clamp(offset));
            }
            return;
        };

        if let Some(in_flight) = &mut self.in_flight {
            in_flight.transition.retarget(new_target);
            in_flight.resolve_show = false;
            match &mut in_flight.animation {
                Some(animation) => animation.retarget(to),
                None => {
                    let from = self
                        .offset
                        .or_else(|| self.anchors.position_of(self.current_value))
                        .unwrap_or(to);
                    self.offset = Some(from);
                    in_flight.animation = Some(ScalarAnimation::new(
                        self.animation_spec,
                        from,
                        to,
                        in_flight.velocity,
                    ));
                }
            }
        } else if self.dragging {
            self.offset = self.offset.map(|offset| self.anchors.clamp(offset));
            self.current_value = new_target;
        } else {
            self.offset = Some(to);
            self.current_value = new_target;
        }
    }

    /// Animates to [`GleamValue::PartiallyExpanded`] if it has an anchor, else
    /// [`GleamValue::Expanded`].
    ///
    /// Before the first layout the request stays pending and picks its target
    /// once anchors are known.
    pub fn show(&mut self) -> Transition {
        let target = if self.has_partially_expanded_state() {
            GleamValue::PartiallyExpanded
        } else {
            GleamValue::Expanded
        };
        if self.anchors.has_anchor_for(target) {
            return self.animate_to(target, self.last_velocity);
        }
        if !self.confirm_value_change(target) {
            debug!(target = %target, "show vetoed");
            return Transition::with_status(target, TransitionStatus::Vetoed);
        }
        self.start_transition(target, self.last_velocity, true)
    }

    /// Animates to [`GleamValue::Hidden`].
    pub fn hide(&mut self) -> Result<Transition, GleamError> {
        if self.skip_hidden_state {
            warn!("hide() called on a sheet that skips its hidden state");
            return Err(GleamError::HiddenStateSkipped);
        }
        Ok(self.animate_to(GleamValue::Hidden, self.last_velocity))
    }

    /// Animates to [`GleamValue::Expanded`].
    pub fn expand(&mut self) -> Transition {
        self.animate_to(GleamValue::Expanded, self.last_velocity)
    }

    /// Animates to [`GleamValue::PartiallyExpanded`].
    pub fn partial_expand(&mut self) -> Result<Transition, GleamError> {
        if self.skip_partially_expanded {
            warn!("partial_expand() called on a sheet that skips its partial state");
            return Err(GleamError::PartiallyExpandedSkipped);
        }
        Ok(self.animate_to(GleamValue::PartiallyExpanded, self.last_velocity))
    }

    /// Snaps to [`GleamValue::Hidden`] without animating.
    ///
    /// Cancels any in-flight transition. A no-op when already settled hidden.
    pub fn forced_hide(&mut self) -> Result<Transition, GleamError> {
        if self.skip_hidden_state {
            warn!("forced_hide() called on a sheet that skips its hidden state");
            return Err(GleamError::HiddenStateSkipped);
        }
        Ok(self.snap_to(GleamValue::Hidden))
    }

    /// Animates to `target`, starting with `velocity` pixels per second.
    ///
    /// Supersedes the in-flight transition. A vetoed target leaves the state
    /// untouched and returns an already-resolved handle.
    pub fn animate_to(&mut self, target: GleamValue, velocity: f64) -> Transition {
        if self.is_settled_at(target) {
            return Transition::with_status(target, TransitionStatus::Completed);
        }
        if !self.confirm_value_change(target) {
            debug!(target = %target, "sheet transition vetoed");
            return Transition::with_status(target, TransitionStatus::Vetoed);
        }
        self.start_transition(target, velocity, false)
    }

    /// Jumps to `target`, cancelling the in-flight transition.
    ///
    /// If `target` has no anchor yet only the current value changes; the
    /// offset follows on the next layout.
    pub fn snap_to(&mut self, target: GleamValue) -> Transition {
        if self.is_settled_at(target) {
            return Transition::with_status(target, TransitionStatus::Completed);
        }
        if !self.confirm_value_change(target) {
            debug!(target = %target, "sheet snap vetoed");
            return Transition::with_status(target, TransitionStatus::Vetoed);
        }
        self.cancel_in_flight();
        self.dragging = false;
        if let Some(position) = self.anchors.position_of(target) {
            self.offset = Some(position);
        }
        self.current_value = target;
        self.last_velocity = 0.0;
        debug!(target = %target, "sheet snapped");
        Transition::with_status(target, TransitionStatus::Completed)
    }

    /// Settles a released drag or fling.
    ///
    /// A sheet resting on its current anchor stays there. A release faster than the velocity threshold commits to the next anchor
    /// in the fling direction; slower releases move on only once the drag
    /// travelled past the positional threshold. A vetoed target animates back
    /// to the pre-gesture value.
    pub fn settle(&mut self, velocity: f64) -> Result<Transition, GleamError> {
        let offset = self.require_offset()?;
        self.dragging = false;
        self.last_velocity = velocity;
        let previous = self.current_value;
        let mut target = self.compute_target(offset, previous, velocity);
        if target != previous && !self.confirm_value_change(target) {
            debug!(target = %target, "settle target vetoed; returning to {previous}");
            target = previous;
        }
        trace!(offset, velocity, target = %target, "settling");
        Ok(self.start_transition(target, velocity, false))
    }

    /// Marks the start of a direct drag, cancelling the in-flight transition.
    pub fn drag_started(&mut self) {
        self.cancel_in_flight();
        self.dragging = true;
    }

    /// Moves the offset by `delta`, clamped to the anchor range.
    ///
    /// Returns how much of `delta` was consumed. Before the first layout
    /// nothing is consumed. A nonzero delta supersedes the in-flight transition.
    pub fn dispatch_raw_delta(&mut self, delta: f64) -> f64 {
        let Some(offset) = self.offset else {
            return 0.0;
        };
        if delta == 0.0 || self.anchors.is_empty() {
            return 0.0;
        }
        let new_offset = self.anchors.clamp(offset + delta);
        let consumed = new_offset - offset;
        if consumed != 0.0 {
            self.cancel_in_flight();
            self.offset = Some(new_offset);
            trace!(delta, consumed, offset = new_offset, "sheet dragged");
        }
        consumed
    }

    /// Ends a direct drag and settles with the release velocity.
    pub fn drag_stopped(&mut self, velocity: f64) -> Result<Transition, GleamError> {
        self.settle(velocity)
    }

    /// Steps the in-flight animation by `dt_ms` milliseconds.
    ///
    /// Returns `true` while a transition is still running (including one that
    /// waits for a layout pass).
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        let Some(in_flight) = &mut self.in_flight else {
            return false;
        };
        let Some(animation) = &mut in_flight.animation else {
            return true;
        };
        let frame = animation.step(dt_ms);
        self.offset = Some(frame.value);
        self.last_velocity = frame.velocity;
        if !frame.finished {
            return true;
        }
        if let Some(done) = self.in_flight.take() {
            let target = done.transition.target();
            self.current_value = target;
            self.last_velocity = 0.0;
            done.transition.resolve(TransitionStatus::Completed);
            debug!(target = %target, "sheet transition completed");
        }
        false
    }

    fn is_settled_at(&self, target: GleamValue) -> bool {
        if self.in_flight.is_some() || self.dragging || self.current_value != target {
            return false;
        }
        match (self.offset, self.anchors.position_of(target)) {
            (Some(offset), Some(position)) => offset == position,
            _ => true,
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(target = %in_flight.transition.target(), "sheet transition cancelled");
            in_flight.transition.resolve(TransitionStatus::Cancelled);
        }
    }

    fn start_transition(&mut self, target: GleamValue, velocity: f64, resolve_show: bool) -> Transition {
        self.cancel_in_flight();
        self.dragging = false;
        let transition = Transition::running(target);
        let from = self
            .offset
            .or_else(|| self.anchors.position_of(self.current_value));
        let to = self.anchors.position_of(target);
        let animation = match (from, to) {
            (Some(from), Some(to)) if from == to => {
                self.offset = Some(to);
                self.current_value = target;
                self.last_velocity = 0.0;
                transition.resolve(TransitionStatus::Completed);
                return transition;
            }
            (Some(from), Some(to)) => {
                self.offset = Some(from);
                Some(ScalarAnimation::new(self.animation_spec, from, to, velocity))
            }
            _ => None,
        };
        debug!(
            target = %target,
            pending = animation.is_none(),
            "sheet transition started"
        );
        self.in_flight = Some(InFlight {
            transition: transition.clone(),
            animation,
            resolve_show,
            velocity,
        });
        transition
    }

    /// Picks the value a release at `offset` with `velocity` should settle at.
    fn compute_target(&self, offset: f64, current: GleamValue, velocity: f64) -> GleamValue {
        let Some(current_position) = self.anchors.position_of(current) else {
            return current;
        };
        // A sheet resting on its anchor stays put whatever the velocity.
        if offset == current_position {
            return current;
        }
        if velocity.abs() >= self.velocity_threshold {
            return self
                .anchors
                .next_anchor(offset, velocity > 0.0, true)
                .unwrap_or(current);
        }
        let toward_hidden = current_position < offset;
        let Some(next) = self.anchors.closest_anchor_in_direction(offset, toward_hidden) else {
            return current;
        };
        let Some(next_position) = self.anchors.position_of(next) else {
            return current;
        };
        let distance = (next_position - current_position).abs();
        let travelled = (offset - current_position).abs();
        if travelled < self.positional_threshold.min(distance) {
            current
        } else {
            next
        }
    }
}
