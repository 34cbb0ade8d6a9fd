// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gleam Sheet: a headless modal bottom sheet.
//!
//! This crate owns the interesting part of a bottom sheet: the drag/animation
//! state machine that decides where the sheet rests. It does not render,
//! recognize gestures, or talk to a window system. Hosts feed it layout sizes,
//! drag deltas, fling velocities and frame ticks, and read back offsets,
//! surface geometry, scrim alpha and events.
//!
//! - [`GleamState`]: the state machine. Three discrete values
//!   ([`GleamValue`]), anchors recomputed every layout pass
//!   ([`compute_anchors`]), velocity-aware settling, vetoable transitions.
//! - [`Transition`]: the handle every transition returns. Starting a new one
//!   cancels the previous; handles can be polled or awaited.
//! - [`GleamNestedScroll`]: arbitrates deltas and flings between the sheet and
//!   scrollable content inside it ([`NestedScrollConnection`]).
//! - [`SurfaceFrame`]: corner radius, width and scrim interpolation.
//! - [`GleamSheet`] / [`GleamScaffold`]: controllers tying the above to
//!   scrim taps, back presses, accessibility actions and dismissal events.
//! - [`GleamTheme`]: token lookup for the default look.
//!
//! ## Example
//!
//! ```rust
//! use gleam_sheet::{GleamState, GleamValue};
//!
//! let mut state = GleamState::builder().build().unwrap();
//! // Container 800px tall, content 300px: hidden at 800, expanded at 500.
//! state.layout(800.0, 300.0);
//! state.show();
//! while state.advance(16.0) {}
//! assert_eq!(state.current_value(), GleamValue::Expanded);
//!
//! // Drag down most of the way and let go slowly: the sheet hides.
//! state.drag_started();
//! state.dispatch_raw_delta(200.0);
//! state.drag_stopped(0.0).unwrap();
//! while state.advance(16.0) {}
//! assert!(!state.is_visible());
//! ```
//!
//! ## Coordinates
//!
//! Offsets are pixels from the top of the container, so larger offsets are
//! more hidden. Deltas and velocities share that axis: positive values move
//! the sheet down toward [`GleamValue::Hidden`]. Design constants are in
//! density-independent units and converted with [`Density`].
//!
//! ## Logging
//!
//! Transitions, vetoes and retargets are reported through `tracing` at
//! `debug` level; per-frame detail at `trace`. No subscriber is installed.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Enable `libm` for floating point
//! math without `std`.

#![no_std]

extern crate alloc;

mod anchors;
mod animation;
mod back;
mod error;
pub mod nested_scroll;
mod properties;
mod sheet;
mod state;
pub mod surface;
pub mod tokens;
mod transition;
mod units;
mod value;

pub use anchors::{DraggableAnchors, compute_anchors};
pub use animation::{AnimationFrame, AnimationSpec, Easing, ScalarAnimation};
pub use back::BackInterceptor;
pub use error::GleamError;
pub use nested_scroll::{GleamNestedScroll, NestedScrollConnection, NestedScrollSource};
pub use properties::{GleamFlags, GleamProperties, SecureFlagPolicy};
pub use sheet::{GleamScaffold, GleamSheet, GleamSheetConfig, SheetAction, SheetEvent, SheetFrame};
pub use state::{
    ConfirmValueChange, GleamState, GleamStateBuilder, POSITIONAL_THRESHOLD_DP,
    VELOCITY_THRESHOLD_DP,
};
pub use surface::{SurfaceFrame, SurfaceParams};
pub use tokens::{ColorScheme, ColorToken, GleamTheme, ShapeScheme, ShapeToken};
pub use transition::{Cancelled, Transition, TransitionStatus};
pub use units::Density;
pub use value::{GleamValue, ParseGleamValueError};
