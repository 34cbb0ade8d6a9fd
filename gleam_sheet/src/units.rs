// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Conversion factor between density-independent units and device pixels.
///
/// Everything the state machine stores is in pixels; `Density` is only used to
/// turn design constants (thresholds, windows, radii) into pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Density {
    scale: f64,
}

impl Density {
    /// One pixel per density-independent unit.
    pub const IDENTITY: Self = Self { scale: 1.0 };

    /// Creates a density with the given pixels-per-unit scale.
    ///
    /// Non-finite or non-positive scales fall back to `1.0`.
    #[must_use]
    pub fn new(scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            Self { scale }
        } else {
            Self::IDENTITY
        }
    }

    /// Pixels per density-independent unit.
    #[must_use]
    pub fn scale(self) -> f64 {
        self.scale
    }

    /// Converts density-independent units to pixels.
    #[must_use]
    pub fn dp_to_px(self, dp: f64) -> f64 {
        dp * self.scale
    }

    /// Converts pixels to density-independent units.
    #[must_use]
    pub fn px_to_dp(self, px: f64) -> f64 {
        px / self.scale
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::IDENTITY
    }
}
