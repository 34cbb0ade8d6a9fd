// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

/// The discrete states a sheet can settle at.
///
/// Variants are declared in visual order from most hidden to most shown, which
/// is also descending pixel offset: `Hidden` sits at the largest offset (off
/// screen) and `Expanded` at the smallest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum GleamValue {
    /// Fully off screen.
    #[default]
    Hidden,
    /// Resting at half the container height.
    PartiallyExpanded,
    /// Showing all of its content (or as much as fits).
    Expanded,
}

impl GleamValue {
    /// All values, most hidden first.
    pub const ALL: [Self; 3] = [Self::Hidden, Self::PartiallyExpanded, Self::Expanded];

    /// Stable name used when persisting the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::PartiallyExpanded => "partially_expanded",
            Self::Expanded => "expanded",
        }
    }
}

impl fmt::Display for GleamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a [`GleamValue`] from an unknown name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown sheet value name")]
pub struct ParseGleamValueError;

impl FromStr for GleamValue {
    type Err = ParseGleamValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|value| value.as_str() == s)
            .ok_or(ParseGleamValueError)
    }
}
