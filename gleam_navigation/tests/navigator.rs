// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `GleamNavigator`.
//!
//! These drive the navigator the way a host does: navigation calls, layout,
//! frame ticks, and user input forwarded to the sheet.

use std::cell::Cell;
use std::rc::Rc;

use gleam_navigation::{
    BackStack, BackStackEntry, ContentHostEvent, DestinationId, EntryId, GleamNavigator,
    NavigationError,
};
use gleam_sheet::{BackInterceptor, GleamSheetConfig, GleamState, GleamValue};
use kurbo::Size;

const LIST: DestinationId = DestinationId(1);
const DETAIL: DestinationId = DestinationId(2);
const A: BackStackEntry = BackStackEntry::new(EntryId(10), LIST);
const B: BackStackEntry = BackStackEntry::new(EntryId(11), DETAIL);

type Nav = GleamNavigator<BackStack, String>;

fn navigator() -> Nav {
    navigator_with(GleamState::builder().build().unwrap())
}

fn navigator_with(state: GleamState) -> Nav {
    let mut nav = Nav::new(state, GleamSheetConfig::default());
    nav.add_destination(LIST, |entry, _| format!("list {}", entry.id.0));
    nav.add_destination(DETAIL, |entry, sheet| {
        format!("detail {} {}", entry.id.0, sheet.current_value())
    });
    nav
}

fn attached() -> Nav {
    let mut nav = navigator();
    nav.on_attach(BackStack::new());
    nav.layout(Size::new(400.0, 800.0), 600.0);
    nav
}

fn settle(nav: &mut Nav) {
    let mut frames = 0;
    while nav.advance(16.0) {
        frames += 1;
        assert!(frames < 1_000, "navigator never settled");
    }
}

#[test]
fn detached_navigator_sees_an_empty_back_stack() {
    let mut nav = navigator();
    assert!(!nav.is_attached());
    assert!(nav.back_stack().is_empty());
    assert_eq!(nav.navigate([A]), Err(NavigationError::NotAttached));
    assert_eq!(nav.pop_back_stack(A, false), Err(NavigationError::NotAttached));
    assert!(!nav.on_back_pressed());
}

#[test]
fn unknown_destination_is_rejected_before_pushing() {
    let mut nav = attached();
    let stray = BackStackEntry::new(EntryId(99), DestinationId(7));
    assert_eq!(
        nav.navigate([A, stray]),
        Err(NavigationError::UnknownDestination {
            destination: DestinationId(7)
        })
    );
    assert!(nav.back_stack().is_empty());
    assert_eq!(
        nav.pop_back_stack(A, false),
        Err(NavigationError::EntryNotFound { entry: EntryId(10) })
    );
}

#[test]
fn navigate_shows_the_entry_and_completes_its_transition() {
    let mut nav = attached();
    nav.navigate([A]).unwrap();
    assert_eq!(nav.transitions_in_progress(), &[A]);
    settle(&mut nav);

    assert_eq!(nav.content().as_deref(), Some("list 10"));
    assert_eq!(
        nav.navigator_sheet_state().current_value(),
        GleamValue::PartiallyExpanded
    );
    assert!(nav.transitions_in_progress().is_empty());
    assert_eq!(
        nav.take_events().as_slice(),
        &[
            ContentHostEvent::RetainedChanged(Some(A)),
            ContentHostEvent::SheetShown(A),
        ]
    );
}

#[test]
fn back_press_pops_the_top_entry_with_an_animated_hide() {
    let mut nav = attached();
    nav.navigate([A]).unwrap();
    settle(&mut nav);
    nav.navigate([B]).unwrap();
    settle(&mut nav);
    assert_eq!(nav.content().as_deref(), Some("detail 11 partially_expanded"));
    nav.take_events();

    assert!(nav.on_back_pressed());
    assert_eq!(nav.back_stack(), &[A]);
    assert_eq!(nav.transitions_in_progress(), &[B]);
    assert!(nav.sheet().state().is_animation_running());
    // The closing sheet keeps its content until it is hidden.
    nav.advance(16.0);
    assert_eq!(nav.retained_entry(), Some(B));

    settle(&mut nav);
    assert_eq!(nav.retained_entry(), Some(A));
    assert!(nav.transitions_in_progress().is_empty());
    assert!(nav.navigator_sheet_state().is_visible());
    assert!(nav.take_events().contains(&ContentHostEvent::SheetDismissed {
        entry: B,
        by_user: false
    }));
}

#[test]
fn scrim_tap_dismissal_pops_the_entry() {
    let mut nav = attached();
    nav.navigate([A]).unwrap();
    settle(&mut nav);
    nav.take_events();

    assert!(nav.sheet_mut().on_scrim_tap().is_some());
    settle(&mut nav);
    assert!(nav.back_stack().is_empty());
    assert_eq!(nav.retained_entry(), None);
    assert_eq!(nav.content(), None);
    assert_eq!(
        nav.take_events().as_slice(),
        &[
            ContentHostEvent::SheetDismissed {
                entry: A,
                by_user: true
            },
            ContentHostEvent::RetainedChanged(None),
        ]
    );
}

#[test]
fn drag_dismissal_pops_the_entry() {
    let mut nav = attached();
    nav.navigate([A]).unwrap();
    settle(&mut nav);

    let sheet = nav.sheet_mut();
    sheet.drag_started();
    sheet.drag_by(150.0);
    sheet.drag_stopped(2_000.0).unwrap();
    nav.update();
    settle(&mut nav);
    assert!(nav.back_stack().is_empty());
    assert!(!nav.navigator_sheet_state().is_visible());
}

#[test]
fn popping_the_last_entry_hides_without_animation() {
    let mut nav = attached();
    nav.navigate([A]).unwrap();
    settle(&mut nav);

    nav.pop_back_stack(A, true).unwrap();
    assert!(!nav.navigator_sheet_state().is_visible());
    assert!(!nav.sheet().state().is_animation_running());
    assert_eq!(nav.navigator_sheet_state().offset(), Some(800.0));
    assert_eq!(nav.controller().unwrap().saved_entries(), &[A]);
    assert!(!nav.on_back_pressed());
}

#[test]
fn dismissing_the_top_sheet_reveals_the_one_beneath() {
    let mut nav = attached();
    nav.navigate([A]).unwrap();
    settle(&mut nav);
    nav.navigate([B]).unwrap();
    settle(&mut nav);

    nav.sheet_mut().on_scrim_tap();
    settle(&mut nav);
    assert_eq!(nav.back_stack(), &[A]);
    assert_eq!(nav.content().as_deref(), Some("list 10"));
    assert!(nav.navigator_sheet_state().is_visible());
}

#[test]
fn vetoed_hide_still_completes_push_and_pop() {
    let state = GleamState::builder()
        .confirm_value_change(|value| value != GleamValue::Hidden)
        .build()
        .unwrap();
    let mut nav = navigator_with(state);
    nav.on_attach(BackStack::new());
    nav.layout(Size::new(400.0, 800.0), 600.0);
    nav.navigate([A]).unwrap();
    settle(&mut nav);

    nav.navigate([B]).unwrap();
    settle(&mut nav);
    assert_eq!(nav.retained_entry(), Some(B));
    assert!(nav.transitions_in_progress().is_empty());

    nav.pop_back_stack(B, false).unwrap();
    settle(&mut nav);
    assert_eq!(nav.retained_entry(), Some(A));
    assert!(nav.navigator_sheet_state().is_visible());
    assert!(nav.transitions_in_progress().is_empty());
}

struct Registered(Rc<Cell<bool>>);

impl BackInterceptor for Registered {
    fn register(&mut self) {
        self.0.set(true);
    }
    fn unregister(&mut self) {
        self.0.set(false);
    }
}

#[test]
fn back_is_routed_through_the_back_stack() {
    let registered = Rc::new(Cell::new(false));
    let mut nav = attached();
    nav.set_back_interceptor(Box::new(Registered(registered.clone())));
    nav.navigate([A]).unwrap();
    settle(&mut nav);
    assert!(registered.get());

    // The sheet leaves the gesture to the navigator.
    assert!(!nav.sheet_mut().on_back_pressed());
    assert_eq!(nav.back_stack(), &[A]);

    assert!(nav.on_back_pressed());
    settle(&mut nav);
    assert!(nav.back_stack().is_empty());
    assert!(!registered.get());
}
