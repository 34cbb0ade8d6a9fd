// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gleam Navigation: bottom sheets as back-stack destinations.
//!
//! A [`GleamNavigator`] is attached to an ordered back stack (anything
//! implementing [`BackStackController`]; [`BackStack`] is an in-memory one)
//! and shows the top entry in a single [`GleamSheet`](gleam_sheet::GleamSheet).
//! The back stack is the authority: system back pops an entry, and a sheet the
//! user dismisses pops its entry.
//!
//! The interesting part is [`GleamContentHost`], which keeps the displayed
//! ("retained") entry on screen until the sheet has finished hiding, so the
//! content never changes under a closing animation.
//!
//! ## Example
//!
//! ```rust
//! use gleam_navigation::{BackStack, BackStackEntry, DestinationId, EntryId, GleamNavigator};
//! use gleam_sheet::{GleamSheetConfig, GleamState};
//! use kurbo::Size;
//!
//! let state = GleamState::builder().build().unwrap();
//! let mut nav: GleamNavigator<BackStack, &'static str> =
//!     GleamNavigator::new(state, GleamSheetConfig::default());
//! nav.add_destination(DestinationId(1), |_, _| "settings");
//! nav.on_attach(BackStack::new());
//!
//! let entry = BackStackEntry::new(EntryId(1), DestinationId(1));
//! nav.navigate([entry]).unwrap();
//! nav.layout(Size::new(400.0, 800.0), 300.0);
//! while nav.advance(16.0) {}
//!
//! assert_eq!(nav.content(), Some("settings"));
//! assert!(nav.navigator_sheet_state().is_visible());
//! assert!(nav.transitions_in_progress().is_empty());
//!
//! // Back pops the entry. With nothing beneath it the sheet hides at once.
//! assert!(nav.on_back_pressed());
//! while nav.advance(16.0) {}
//! assert!(nav.back_stack().is_empty());
//! assert_eq!(nav.retained_entry(), None);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod back_stack;
mod content_host;
mod navigator;

pub use back_stack::{BackStack, BackStackController, BackStackEntry, DestinationId, EntryId};
pub use content_host::{ContentHostEvent, GleamContentHost};
pub use navigator::{GleamNavigator, GleamNavigatorState, NavigationError};
