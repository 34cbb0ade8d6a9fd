// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame surface interpolation.
//!
//! Everything here is a pure function of the current offset. Near the top of
//! the container (within [`ANIMATION_WINDOW_DP`]) the sheet sharpens its top
//! corners and spreads to the container edges; the scrim fades with the
//! fraction of travel between the hidden and the highest anchor.

use kurbo::RoundedRectRadii;
use peniko::Color;

use crate::{Density, DraggableAnchors, GleamFlags};

/// Distance from the top of the container over which the surface interpolates.
pub const ANIMATION_WINDOW_DP: f64 = 120.0;

/// Inputs of [`SurfaceFrame::compute`] that do not change per frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceParams {
    /// Container width in pixels.
    pub container_width: f64,
    /// Maximum sheet width in pixels; ignored with [`GleamFlags::MAX_EDGE`].
    pub max_width: f64,
    /// Resting corner radii in pixels.
    pub corner_radii: RoundedRectRadii,
    /// Scrim color at full opacity of the sheet's travel.
    pub scrim_color: Color,
    /// Behavior flags; only the surface flags are read.
    pub flags: GleamFlags,
    /// Density used to convert the animation window.
    pub density: Density,
}

/// Geometry and scrim of the sheet for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceFrame {
    /// Interpolation factor in `0..=1`; `0` at the top of the container.
    pub t: f64,
    /// Corner radii of the sheet surface.
    pub corner_radii: RoundedRectRadii,
    /// Horizontal margin on each side of the sheet.
    pub horizontal_margin: f64,
    /// Sheet width.
    pub width: f64,
    /// Scrim color with its alpha scaled by the travel fraction.
    pub scrim: Color,
    /// Travel fraction between the hidden and the highest anchor.
    pub scrim_fraction: f64,
}

impl SurfaceFrame {
    /// Computes the frame for `offset` against the current anchors.
    #[must_use]
    pub fn compute(offset: f64, anchors: &DraggableAnchors, params: &SurfaceParams) -> Self {
        let t = interpolation_factor(offset, params.density);

        let corner_radii = if params.flags.contains(GleamFlags::ANIMATE_CORNERS) {
            scale_radii(params.corner_radii, t)
        } else {
            params.corner_radii
        };

        let container_width = params.container_width.max(0.0);
        let resting_width = if params.flags.contains(GleamFlags::MAX_EDGE) {
            container_width
        } else {
            container_width.min(params.max_width.max(0.0))
        };
        let resting_margin = (container_width - resting_width) / 2.0;
        let horizontal_margin = if params.flags.contains(GleamFlags::ANIMATE_EDGE) {
            resting_margin * t
        } else {
            resting_margin
        };

        let scrim_fraction = scrim_fraction(offset, anchors);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "alpha is stored as f32 and the fraction is in 0..=1"
        )]
        let scrim_alpha = scrim_fraction as f32;
        Self {
            t,
            corner_radii,
            horizontal_margin,
            width: container_width - 2.0 * horizontal_margin,
            scrim: params.scrim_color.multiply_alpha(scrim_alpha),
            scrim_fraction,
        }
    }
}

/// `clamp(offset / window, 0, 1)` with the window scaled by `density`.
#[must_use]
pub fn interpolation_factor(offset: f64, density: Density) -> f64 {
    let window = density.dp_to_px(ANIMATION_WINDOW_DP);
    (offset / window).clamp(0.0, 1.0)
}

/// Fraction of travel from the most hidden anchor to the highest one.
///
/// `0` at (or beyond) the most hidden anchor, `1` at the highest. A set with a
/// single position reports `1` so a sheet that cannot hide keeps its scrim.
#[must_use]
pub fn scrim_fraction(offset: f64, anchors: &DraggableAnchors) -> f64 {
    let (Some(min), Some(max)) = (anchors.min_anchor(), anchors.max_anchor()) else {
        return 0.0;
    };
    let span = max - min;
    if span <= 0.0 {
        return 1.0;
    }
    ((max - offset) / span).clamp(0.0, 1.0)
}

fn scale_radii(radii: RoundedRectRadii, t: f64) -> RoundedRectRadii {
    RoundedRectRadii::new(
        radii.top_left * t,
        radii.top_right * t,
        radii.bottom_right,
        radii.bottom_left,
    )
}

#[cfg(test)]
mod tests {
    use kurbo::RoundedRectRadii;
    use peniko::Color;

    use super::{SurfaceFrame, SurfaceParams, interpolation_factor, scrim_fraction};
    use crate::{Density, DraggableAnchors, GleamFlags, GleamValue};

    fn params(flags: GleamFlags) -> SurfaceParams {
        SurfaceParams {
            container_width: 1000.0,
            max_width: 640.0,
            corner_radii: RoundedRectRadii::new(28.0, 28.0, 0.0, 0.0),
            scrim_color: Color::from_rgba8(0, 0, 0, 128),
            flags,
            density: Density::IDENTITY,
        }
    }

    fn anchors() -> DraggableAnchors {
        DraggableAnchors::new()
            .with(GleamValue::Hidden, 800.0)
            .with(GleamValue::PartiallyExpanded, 400.0)
            .with(GleamValue::Expanded, 0.0)
    }

    #[test]
    fn factor_clamps_to_window() {
        assert_eq!(interpolation_factor(-10.0, Density::IDENTITY), 0.0);
        assert_eq!(interpolation_factor(60.0, Density::IDENTITY), 0.5);
        assert_eq!(interpolation_factor(500.0, Density::IDENTITY), 1.0);
        assert_eq!(interpolation_factor(120.0, Density::new(2.0)), 0.5);
    }

    #[test]
    fn corners_and_edges_interpolate_near_the_top() {
        let p = params(GleamFlags::ANIMATE_CORNERS | GleamFlags::ANIMATE_EDGE);
        let top = SurfaceFrame::compute(0.0, &anchors(), &p);
        assert_eq!(top.corner_radii.top_left, 0.0);
        assert_eq!(top.horizontal_margin, 0.0);
        assert_eq!(top.width, 1000.0);

        let mid = SurfaceFrame::compute(60.0, &anchors(), &p);
        assert_eq!(mid.corner_radii.top_right, 14.0);
        assert_eq!(mid.horizontal_margin, 90.0);

        let rest = SurfaceFrame::compute(400.0, &anchors(), &p);
        assert_eq!(rest.corner_radii.top_left, 28.0);
        assert_eq!(rest.width, 640.0);
    }

    #[test]
    fn static_surface_without_animation_flags() {
        let frame = SurfaceFrame::compute(0.0, &anchors(), &params(GleamFlags::empty()));
        assert_eq!(frame.corner_radii.top_left, 28.0);
        assert_eq!(frame.horizontal_margin, 180.0);

        let full = SurfaceFrame::compute(400.0, &anchors(), &params(GleamFlags::MAX_EDGE));
        assert_eq!(full.width, 1000.0);
    }

    #[test]
    fn scrim_fades_with_travel() {
        let a = anchors();
        assert_eq!(scrim_fraction(800.0, &a), 0.0);
        assert_eq!(scrim_fraction(400.0, &a), 0.5);
        assert_eq!(scrim_fraction(0.0, &a), 1.0);
        assert_eq!(scrim_fraction(900.0, &a), 0.0);
        assert_eq!(scrim_fraction(0.0, &DraggableAnchors::new()), 0.0);
        let pinned = DraggableAnchors::new().with(GleamValue::Expanded, 100.0);
        assert_eq!(scrim_fraction(100.0, &pinned), 1.0);

        let hidden = SurfaceFrame::compute(800.0, &a, &params(GleamFlags::empty()));
        assert_eq!(hidden.scrim.components[3], 0.0);
    }
}
