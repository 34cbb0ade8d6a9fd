// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Whether the sheet's window should be marked secure (excluded from
/// screenshots and non-secure displays).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SecureFlagPolicy {
    /// Follow the parent window.
    #[default]
    Inherit,
    /// Always secure.
    SecureOn,
    /// Never secure.
    SecureOff,
}

impl SecureFlagPolicy {
    /// Resolves the policy against the parent window's secure flag.
    #[must_use]
    pub fn should_apply(self, parent_is_secure: bool) -> bool {
        match self {
            Self::Inherit => parent_is_secure,
            Self::SecureOn => true,
            Self::SecureOff => false,
        }
    }
}

bitflags::bitflags! {
    /// Behavior switches of a sheet.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct GleamFlags: u8 {
        /// The sheet window takes focus.
        const FOCUSABLE                = 0b0000_0001;
        /// System back hides the sheet.
        const DISMISS_ON_BACK_PRESS    = 0b0000_0010;
        /// Tapping the scrim hides the sheet.
        const DISMISS_ON_CLICK_OUTSIDE = 0b0000_0100;
        /// Top corners sharpen as the sheet reaches the top of the container.
        const ANIMATE_CORNERS          = 0b0000_1000;
        /// Horizontal margins shrink as the sheet reaches the top of the container.
        const ANIMATE_EDGE             = 0b0001_0000;
        /// Ignore the maximum width and span the whole container.
        const MAX_EDGE                 = 0b0010_0000;
    }
}

impl Default for GleamFlags {
    fn default() -> Self {
        Self::FOCUSABLE
            | Self::DISMISS_ON_BACK_PRESS
            | Self::DISMISS_ON_CLICK_OUTSIDE
            | Self::ANIMATE_CORNERS
            | Self::ANIMATE_EDGE
    }
}

/// Window and behavior properties of a sheet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GleamProperties {
    /// Secure-window policy.
    pub secure_policy: SecureFlagPolicy,
    /// Behavior switches.
    pub flags: GleamFlags,
}

impl GleamProperties {
    /// Properties with the given flags and an inherited secure policy.
    #[must_use]
    pub fn with_flags(flags: GleamFlags) -> Self {
        Self {
            secure_policy: SecureFlagPolicy::Inherit,
            flags,
        }
    }

    /// Replaces the secure policy.
    #[must_use]
    pub fn secure_policy(mut self, policy: SecureFlagPolicy) -> Self {
        self.secure_policy = policy;
        self
    }

    /// Returns `true` if every flag in `flags` is set.
    #[must_use]
    pub fn contains(&self, flags: GleamFlags) -> bool {
        self.flags.contains(flags)
    }
}
