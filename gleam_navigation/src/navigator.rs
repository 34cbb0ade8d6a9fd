// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use core::fmt;

use gleam_sheet::{BackInterceptor, GleamSheet, GleamSheetConfig, GleamState, GleamValue};
use hashbrown::HashMap;
use kurbo::Size;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    BackStackController, BackStackEntry, ContentHostEvent, DestinationId, EntryId,
    GleamContentHost,
};

/// Errors reported by [`GleamNavigator`] operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The navigator has no back-stack controller yet.
    #[error("the sheet navigator is not attached to a back stack")]
    NotAttached,
    /// An entry names a destination that was never added.
    #[error("no sheet destination registered for {destination:?}")]
    UnknownDestination {
        /// The unregistered destination.
        destination: DestinationId,
    },
    /// A pop named an entry that is not on the back stack.
    #[error("entry {entry:?} is not on the back stack")]
    EntryNotFound {
        /// The missing entry.
        entry: EntryId,
    },
}

/// Read-only view of the navigator's sheet.
#[derive(Clone, Copy, Debug)]
pub struct GleamNavigatorState<'a> {
    state: &'a GleamState,
}

impl<'a> GleamNavigatorState<'a> {
    /// Wraps `state`.
    #[must_use]
    pub fn new(state: &'a GleamState) -> Self {
        Self { state }
    }

    /// The settled value.
    #[must_use]
    pub fn current_value(&self) -> GleamValue {
        self.state.current_value()
    }

    /// The value the sheet is heading to.
    #[must_use]
    pub fn target_value(&self) -> GleamValue {
        self.state.target_value()
    }

    /// Returns `true` unless the sheet is settled hidden.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// Current offset, or `None` before the first layout.
    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        self.state.offset()
    }
}

type ContentBuilder<T> = Box<dyn Fn(&BackStackEntry, GleamNavigatorState<'_>) -> T>;

/// A navigator whose destinations are shown in one bottom sheet.
///
/// `C` is the back stack the navigator is attached to and `T` the content
/// type destinations build for their entries.
///
/// Bridge events accumulate until the host drains them with
/// [`GleamNavigator::take_events`], which it should do once per frame.
pub struct GleamNavigator<C, T> {
    controller: Option<C>,
    sheet: GleamSheet,
    host: GleamContentHost,
    destinations: HashMap<DestinationId, ContentBuilder<T>>,
    events: SmallVec<[ContentHostEvent; 4]>,
}

impl<C, T> fmt::Debug for GleamNavigator<C, T>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GleamNavigator")
            .field("controller", &self.controller)
            .field("sheet", &self.sheet)
            .field("host", &self.host)
            .field("destinations", &self.destinations.len())
            .field("events", &self.events)
            .finish()
    }
}

impl<C: BackStackController, T> GleamNavigator<C, T> {
    /// Creates a detached navigator driving `state`.
    ///
    /// The sheet is shown and hidden by the navigator only; it does not show
    /// itself on layout, and back presses go through the back stack.
    #[must_use]
    pub fn new(state: GleamState, config: GleamSheetConfig) -> Self {
        Self {
            controller: None,
            sheet: GleamSheet::hosted(state, config).with_back_delegated(),
            host: GleamContentHost::new(),
            destinations: HashMap::new(),
            events: SmallVec::new(),
        }
    }

    /// Registers the content builder of a destination.
    pub fn add_destination(
        &mut self,
        destination: DestinationId,
        content: impl Fn(&BackStackEntry, GleamNavigatorState<'_>) -> T + 'static,
    ) {
        self.destinations.insert(destination, Box::new(content));
    }

    /// Installs the platform back hook.
    ///
    /// It is registered while the sheet is shown. The host delivers the
    /// intercepted gesture to [`GleamNavigator::on_back_pressed`].
    pub fn set_back_interceptor(&mut self, interceptor: Box<dyn BackInterceptor>) {
        self.sheet.set_back_interceptor(interceptor);
    }

    /// Attaches the navigator to a back stack.
    pub fn on_attach(&mut self, controller: C) {
        debug!("sheet navigator attached");
        self.controller = Some(controller);
        self.update();
    }

    /// Returns `true` once [`GleamNavigator::on_attach`] was called.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.controller.is_some()
    }

    /// The attached controller.
    #[must_use]
    pub fn controller(&self) -> Option<&C> {
        self.controller.as_ref()
    }

    /// The back stack; empty until attached.
    #[must_use]
    pub fn back_stack(&self) -> &[BackStackEntry] {
        self.controller
            .as_ref()
            .map(BackStackController::back_stack)
            .unwrap_or_default()
    }

    /// Transitions not yet marked complete; empty until attached.
    #[must_use]
    pub fn transitions_in_progress(&self) -> &[BackStackEntry] {
        self.controller
            .as_ref()
            .map(BackStackController::transitions_in_progress)
            .unwrap_or_default()
    }

    /// Pushes `entries` with transitions.
    ///
    /// Fails without pushing anything if an entry names an unknown destination.
    pub fn navigate(
        &mut self,
        entries: impl IntoIterator<Item = BackStackEntry>,
    ) -> Result<(), NavigationError> {
        let entries: SmallVec<[BackStackEntry; 2]> = entries.into_iter().collect();
        if let Some(entry) = entries
            .iter()
            .find(|entry| !self.destinations.contains_key(&entry.destination))
        {
            warn!(destination = entry.destination.0, "navigate to unknown sheet destination");
            return Err(NavigationError::UnknownDestination {
                destination: entry.destination,
            });
        }
        let controller = self
            .controller
            .as_mut()
            .ok_or(NavigationError::NotAttached)?;
        for entry in entries {
            debug!(entry = entry.id.0, "navigate");
            controller.push_with_transition(entry);
        }
        self.update();
        Ok(())
    }

    /// Pops `entry` and everything above it with a transition.
    pub fn pop_back_stack(
        &mut self,
        entry: BackStackEntry,
        save_state: bool,
    ) -> Result<(), NavigationError> {
        let controller = self
            .controller
            .as_mut()
            .ok_or(NavigationError::NotAttached)?;
        if !controller.back_stack().contains(&entry) {
            return Err(NavigationError::EntryNotFound { entry: entry.id });
        }
        debug!(entry = entry.id.0, save_state, "pop back stack");
        controller.pop_with_transition(entry, save_state);
        self.update();
        Ok(())
    }

    /// Handles the system back gesture while a sheet entry is displayed.
    ///
    /// Pops the retained entry with a transition rather than hiding the sheet
    /// directly. Returns `true` if it was consumed.
    pub fn on_back_pressed(&mut self) -> bool {
        let Some(entry) = self.host.retained_entry() else {
            return false;
        };
        if self.sheet.state().target_value() == GleamValue::Hidden {
            return false;
        }
        self.pop_back_stack(entry, false).is_ok()
    }

    /// Lays out the sheet and reconciles.
    pub fn layout(&mut self, container: Size, content_height: f64) {
        self.sheet.layout(container, content_height);
        self.update();
    }

    /// Steps the sheet and reconciles. Returns `true` while anything is in flight.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        let running = self.sheet.advance(dt_ms);
        self.update();
        running || self.host.is_swapping() || self.sheet.state().is_animation_running()
    }

    /// Reconciles the sheet with the back stack.
    ///
    /// Call after forwarding user input to [`GleamNavigator::sheet_mut`].
    pub fn update(&mut self) {
        // Dismissals are observed through visibility by the content host.
        self.sheet.take_events();
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        let events = self.host.update(self.sheet.state_mut(), controller);
        self.events.extend(events);
    }

    /// The entry whose content is displayed.
    #[must_use]
    pub fn retained_entry(&self) -> Option<BackStackEntry> {
        self.host.retained_entry()
    }

    /// Builds the content of the retained entry.
    #[must_use]
    pub fn content(&self) -> Option<T> {
        let entry = self.host.retained_entry()?;
        let build = self.destinations.get(&entry.destination)?;
        Some(build(&entry, self.navigator_sheet_state()))
    }

    /// Read-only view of the sheet state.
    #[must_use]
    pub fn navigator_sheet_state(&self) -> GleamNavigatorState<'_> {
        GleamNavigatorState::new(self.sheet.state())
    }

    /// The sheet controller.
    #[must_use]
    pub fn sheet(&self) -> &GleamSheet {
        &self.sheet
    }

    /// The sheet controller, for forwarding gestures and taps.
    pub fn sheet_mut(&mut self) -> &mut GleamSheet {
        &mut self.sheet
    }

    /// Drains events produced since the last call.
    ///
    /// Nothing else clears the buffer.
    pub fn take_events(&mut self) -> SmallVec<[ContentHostEvent; 4]> {
        core::mem::take(&mut self.events)
    }
}
