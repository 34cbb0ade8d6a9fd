// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::GleamValue;

/// Programmer errors raised by [`GleamState`](crate::GleamState) operations.
///
/// These are precondition violations: they are reported immediately and are
/// never retried.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GleamError {
    /// `partial_expand` was called on a state built with `skip_partially_expanded`.
    #[error(
        "attempted to animate to partially expanded when skip_partially_expanded was enabled; \
         set skip_partially_expanded to false to use this function"
    )]
    PartiallyExpandedSkipped,
    /// `hide`/`forced_hide` was called on a state built with `skip_hidden_state`.
    #[error(
        "attempted to animate to hidden when skip_hidden_state was enabled; \
         set skip_hidden_state to false to use this function"
    )]
    HiddenStateSkipped,
    /// The initial value names a state that the skip flags exclude.
    #[error("initial value {value} conflicts with the configured skip flags")]
    InitialValueConflict {
        /// The rejected initial value.
        value: GleamValue,
    },
    /// The offset was read before the first layout pass.
    #[error("the offset was read before it was initialized; did you access it before the first layout?")]
    OffsetUnavailable,
}
