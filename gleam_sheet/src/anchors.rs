// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor sets: the offsets a sheet can settle at.
//!
//! [`DraggableAnchors`] is a tiny ordered map from [`GleamValue`] to a pixel
//! offset. [`compute_anchors`] builds the set for one layout pass from the
//! container and content heights.
//!
//! ```
//! use gleam_sheet::{GleamValue, compute_anchors};
//!
//! let anchors = compute_anchors(800.0, 300.0, false, false);
//! assert_eq!(anchors.position_of(GleamValue::Hidden), Some(800.0));
//! assert_eq!(anchors.position_of(GleamValue::Expanded), Some(500.0));
//! // Content shorter than half the container: no partial anchor.
//! assert!(!anchors.has_anchor_for(GleamValue::PartiallyExpanded));
//! ```

use smallvec::SmallVec;

use crate::GleamValue;

/// A set of (value, offset) pairs for one layout pass.
///
/// Each value appears at most once. Offsets are in pixels measured from the
/// top of the container, so larger offsets are "more hidden".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DraggableAnchors {
    anchors: SmallVec<[(GleamValue, f64); 3]>,
}

impl DraggableAnchors {
    /// Creates an empty anchor set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` at `position`, replacing a previous entry for the same value.
    pub fn insert(&mut self, value: GleamValue, position: f64) {
        if let Some(entry) = self.anchors.iter_mut().find(|(v, _)| *v == value) {
            entry.1 = position;
        } else {
            self.anchors.push((value, position));
        }
    }

    /// Builder-style variant of [`DraggableAnchors::insert`].
    #[must_use]
    pub fn with(mut self, value: GleamValue, position: f64) -> Self {
        self.insert(value, position);
        self
    }

    /// Returns `true` if `value` has an anchor.
    #[must_use]
    pub fn has_anchor_for(&self, value: GleamValue) -> bool {
        self.anchors.iter().any(|(v, _)| *v == value)
    }

    /// Returns the offset registered for `value`.
    #[must_use]
    pub fn position_of(&self, value: GleamValue) -> Option<f64> {
        self.anchors
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, p)| *p)
    }

    /// Smallest registered offset (the most shown anchor).
    #[must_use]
    pub fn min_anchor(&self) -> Option<f64> {
        self.anchors.iter().map(|(_, p)| *p).reduce(f64::min)
    }

    /// Largest registered offset (the most hidden anchor).
    #[must_use]
    pub fn max_anchor(&self) -> Option<f64> {
        self.anchors.iter().map(|(_, p)| *p).reduce(f64::max)
    }

    /// The value whose anchor is nearest to `position`.
    ///
    /// Ties go to the value registered first.
    #[must_use]
    pub fn closest_anchor(&self, position: f64) -> Option<GleamValue> {
        let mut best: Option<(GleamValue, f64)> = None;
        for &(value, anchor) in &self.anchors {
            let distance = (anchor - position).abs();
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((value, distance));
            }
        }
        best.map(|(value, _)| value)
    }

    /// The nearest anchor at or beyond `position` in one direction.
    ///
    /// With `toward_hidden` the search only considers anchors at offsets
    /// `>= position`; otherwise only anchors `<= position`. Falls back to
    /// [`DraggableAnchors::closest_anchor`] when no anchor lies in that direction.
    #[must_use]
    pub fn closest_anchor_in_direction(
        &self,
        position: f64,
        toward_hidden: bool,
    ) -> Option<GleamValue> {
        self.next_anchor(position, toward_hidden, true)
            .or_else(|| self.closest_anchor(position))
    }

    /// The nearest anchor in one direction from `position`, without fallback.
    ///
    /// `inclusive` controls whether an anchor sitting exactly at `position`
    /// counts.
    #[must_use]
    pub fn next_anchor(
        &self,
        position: f64,
        toward_hidden: bool,
        inclusive: bool,
    ) -> Option<GleamValue> {
        let mut best: Option<(GleamValue, f64)> = None;
        for &(value, anchor) in &self.anchors {
            let delta = if toward_hidden {
                anchor - position
            } else {
                position - anchor
            };
            if delta < 0.0 || (!inclusive && delta == 0.0) {
                continue;
            }
            if best.is_none_or(|(_, d)| delta < d) {
                best = Some((value, delta));
            }
        }
        best.map(|(value, _)| value)
    }

    /// Clamps `position` into the registered offset range.
    ///
    /// Returns `position` unchanged when the set is empty.
    #[must_use]
    pub fn clamp(&self, position: f64) -> f64 {
        match (self.min_anchor(), self.max_anchor()) {
            (Some(min), Some(max)) => position.clamp(min, max),
            _ => position,
        }
    }

    /// Number of registered anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if no anchors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Iterates over (value, offset) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (GleamValue, f64)> + '_ {
        self.anchors.iter().copied()
    }

    /// The first value from `preference` that has an anchor.
    #[must_use]
    pub fn first_available(&self, preference: &[GleamValue]) -> Option<GleamValue> {
        preference.iter().copied().find(|v| self.has_anchor_for(*v))
    }
}

/// Computes the anchors of a modal sheet for one layout pass.
///
/// - `Hidden` sits at `container_height` unless `skip_hidden_state`.
/// - `PartiallyExpanded` sits at half the container height when the content
///   is at least that tall and `skip_partially_expanded` is false. Content of
///   exactly half the container yields coinciding partial and expanded anchors.
/// - `Expanded` sits at `max(0, container_height - content_height)` when the
///   content has a nonzero height.
#[must_use]
pub fn compute_anchors(
    container_height: f64,
    content_height: f64,
    skip_partially_expanded: bool,
    skip_hidden_state: bool,
) -> DraggableAnchors {
    let mut anchors = DraggableAnchors::new();
    if !skip_hidden_state {
        anchors.insert(GleamValue::Hidden, container_height);
    }
    let half = container_height / 2.0;
    if !skip_partially_expanded && content_height > 0.0 && content_height >= half {
        anchors.insert(GleamValue::PartiallyExpanded, half);
    }
    if content_height > 0.0 {
        anchors.insert(
            GleamValue::Expanded,
            (container_height - content_height).max(0.0),
        );
    }
    anchors
}
