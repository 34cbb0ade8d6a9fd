// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sheet and scaffold entry points.
//!
//! [`GleamSheet`] is the headless controller of one modal sheet: the host
//! forwards layout, gestures, scrim taps, back presses and frame ticks, and
//! reads back a [`SheetFrame`] plus [`SheetEvent`]s. [`GleamScaffold`] drives
//! the same controller from a visibility boolean instead of showing on entry.
//!
//! ```
//! use gleam_sheet::{GleamSheet, GleamSheetConfig, GleamState, SheetEvent};
//! use kurbo::Size;
//!
//! let state = GleamState::builder().build().unwrap();
//! let mut sheet = GleamSheet::new(state, GleamSheetConfig::default());
//!
//! // The first layout shows the sheet.
//! sheet.layout(Size::new(400.0, 800.0), 300.0);
//! while sheet.advance(16.0) {}
//! assert!(sheet.state().is_visible());
//!
//! // Tapping the scrim hides it and asks the owner to drop it.
//! sheet.on_scrim_tap();
//! while sheet.advance(16.0) {}
//! assert!(sheet.take_events().contains(&SheetEvent::DismissRequested));
//! ```

use alloc::boxed::Box;

use kurbo::{Insets, RoundedRectRadii, Size, Vec2};
use peniko::Color;
use smallvec::SmallVec;
use tracing::debug;

use crate::back::BackRegistration;
use crate::{
    BackInterceptor, ColorToken, Density, GleamError, GleamFlags, GleamNestedScroll,
    GleamProperties, GleamState, GleamTheme, GleamValue, NestedScrollConnection,
    NestedScrollSource, ShapeToken, SurfaceFrame, SurfaceParams, Transition, tokens,
};

/// Visual and behavioral configuration of a sheet.
///
/// Lengths are in density-independent units and converted with `density`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GleamSheetConfig {
    /// Maximum sheet width.
    pub max_width: f64,
    /// Resting corner radii of the surface.
    pub shape: RoundedRectRadii,
    /// Surface color.
    pub container_color: Color,
    /// Preferred color for content drawn on the surface.
    pub content_color: Color,
    /// Surface elevation.
    pub elevation: f64,
    /// Scrim color at full travel.
    pub scrim_color: Color,
    /// Whether a drag handle is drawn at the top of the surface.
    pub drag_handle: bool,
    /// Insets applied to the sheet content, typically the system bars.
    pub content_insets: Insets,
    /// Window and behavior properties.
    pub properties: GleamProperties,
    /// Pixel density of the host.
    pub density: Density,
}

impl GleamSheetConfig {
    /// Builds the default sheet configuration from a theme.
    #[must_use]
    pub fn from_theme(theme: &GleamTheme) -> Self {
        Self {
            max_width: tokens::SHEET_MAX_WIDTH_DP,
            shape: theme.shape(ShapeToken::ExtraLargeTop),
            container_color: theme.color(ColorToken::SurfaceContainerLow),
            content_color: theme.color(ColorToken::OnSurface),
            elevation: tokens::SHEET_ELEVATION_DP,
            scrim_color: theme.scrim(),
            drag_handle: true,
            content_insets: Insets::ZERO,
            properties: GleamProperties::default(),
            density: Density::IDENTITY,
        }
    }
}

impl Default for GleamSheetConfig {
    fn default() -> Self {
        Self::from_theme(&GleamTheme::default())
    }
}

/// Notifications produced by a [`GleamSheet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SheetEvent {
    /// The settled value crossed between hidden and visible.
    VisibilityChanged {
        /// `true` when the sheet left [`GleamValue::Hidden`].
        visible: bool,
    },
    /// A user dismissal finished hidden; the owner should drop the sheet.
    DismissRequested,
}

/// Accessibility actions offered on the drag handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SheetAction {
    /// Partially expanded to expanded.
    Expand,
    /// Expanded to partially expanded.
    Collapse,
    /// Hide the sheet.
    Dismiss,
}

/// Everything a renderer needs for one frame, in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SheetFrame {
    /// Top of the sheet, measured from the top of the container.
    pub offset: f64,
    /// Corner radii, width, margins and scrim.
    pub surface: SurfaceFrame,
    /// Content insets.
    pub content_insets: Insets,
    /// Surface elevation.
    pub elevation: f64,
    /// Surface color.
    pub container_color: Color,
    /// Content color.
    pub content_color: Color,
    /// Drag handle size, if one is drawn.
    pub drag_handle: Option<Size>,
}

/// Headless controller of one modal sheet.
#[derive(Debug)]
pub struct GleamSheet {
    state: GleamState,
    config: GleamSheetConfig,
    container: Option<Size>,
    show_on_first_layout: bool,
    delegates_back: bool,
    user_action: Option<Transition>,
    was_visible: bool,
    back: BackRegistration,
    events: SmallVec<[SheetEvent; 4]>,
}

impl GleamSheet {
    /// Wraps `state`. The sheet shows itself on its first layout pass.
    #[must_use]
    pub fn new(state: GleamState, config: GleamSheetConfig) -> Self {
        let was_visible = state.is_visible();
        Self {
            state,
            config,
            container: None,
            show_on_first_layout: true,
            delegates_back: false,
            user_action: None,
            was_visible,
            back: BackRegistration::default(),
            events: SmallVec::new(),
        }
    }

    /// Wraps `state` for a host that shows and hides the sheet itself.
    ///
    /// Unlike [`GleamSheet::new`] the first layout pass does not show it.
    #[must_use]
    pub fn hosted(state: GleamState, config: GleamSheetConfig) -> Self {
        Self {
            show_on_first_layout: false,
            ..Self::new(state, config)
        }
    }

    /// Leaves the system back gesture to the sheet's owner.
    ///
    /// The back interceptor is still registered while the sheet is shown, but
    /// [`GleamSheet::on_back_pressed`] never hides the sheet. The owner handles
    /// intercepted gestures itself, for example by popping a back stack.
    #[must_use]
    pub fn with_back_delegated(mut self) -> Self {
        self.delegates_back = true;
        self
    }

    /// Returns `true` if back presses are left to the owner.
    #[must_use]
    pub fn delegates_back(&self) -> bool {
        self.delegates_back
    }

    /// The underlying state.
    #[must_use]
    pub fn state(&self) -> &GleamState {
        &self.state
    }

    /// Mutable access for programmatic transitions.
    ///
    /// Transitions started here are not user dismissals.
    pub fn state_mut(&mut self) -> &mut GleamState {
        &mut self.state
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &GleamSheetConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: GleamSheetConfig) {
        self.config = config;
        self.sync();
    }

    /// Installs the platform back hook.
    pub fn set_back_interceptor(&mut self, interceptor: Box<dyn BackInterceptor>) {
        self.back.install(interceptor);
        self.sync();
    }

    /// Whether back presses are currently intercepted.
    #[must_use]
    pub fn is_intercepting_back(&self) -> bool {
        self.back.is_registered()
    }

    /// Lays the sheet out in `container` with content of `content_height`.
    pub fn layout(&mut self, container: Size, content_height: f64) {
        self.container = Some(container);
        self.state.layout(container.height, content_height);
        if core::mem::take(&mut self.show_on_first_layout)
            && self.state.target_value() == GleamValue::Hidden
        {
            debug!("showing sheet on first layout");
            self.state.show();
        }
        self.sync();
    }

    /// Steps animations by `dt_ms`. Returns `true` while still animating.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        let running = self.state.advance(dt_ms);
        self.sync();
        running
    }

    /// Begins a direct drag on the sheet.
    pub fn drag_started(&mut self) {
        self.state.drag_started();
        self.sync();
    }

    /// Moves the sheet by `delta` pixels; returns the consumed part.
    pub fn drag_by(&mut self, delta: f64) -> f64 {
        self.state.dispatch_raw_delta(delta)
    }

    /// Releases a direct drag with `velocity` pixels per second.
    pub fn drag_stopped(&mut self, velocity: f64) -> Result<Transition, GleamError> {
        let transition = self.state.drag_stopped(velocity)?;
        self.track_user_action(&transition);
        Ok(transition)
    }

    /// Handles a tap on the scrim.
    ///
    /// Returns the hide transition, or `None` when the sheet ignores taps
    /// outside.
    pub fn on_scrim_tap(&mut self) -> Option<Transition> {
        if !self
            .config
            .properties
            .contains(GleamFlags::DISMISS_ON_CLICK_OUTSIDE)
            || self.state.target_value() == GleamValue::Hidden
        {
            return None;
        }
        self.user_hide()
    }

    /// Handles the system back gesture. Returns `true` if it was consumed.
    ///
    /// Always `false` when back is delegated to the owner.
    pub fn on_back_pressed(&mut self) -> bool {
        if self.delegates_back || !self.wants_back() {
            return false;
        }
        self.user_hide().is_some()
    }

    /// Actions currently offered on the drag handle.
    #[must_use]
    pub fn accessibility_actions(&self) -> SmallVec<[SheetAction; 3]> {
        let mut actions = SmallVec::new();
        let current = self.state.current_value();
        if current == GleamValue::PartiallyExpanded && self.state.has_expanded_state() {
            actions.push(SheetAction::Expand);
        }
        if current == GleamValue::Expanded && self.state.has_partially_expanded_state() {
            actions.push(SheetAction::Collapse);
        }
        if self.state.is_visible() && !self.state.skip_hidden_state() {
            actions.push(SheetAction::Dismiss);
        }
        actions
    }

    /// Performs a drag-handle action if it is currently offered.
    pub fn perform_action(&mut self, action: SheetAction) -> Option<Transition> {
        if !self.accessibility_actions().contains(&action) {
            return None;
        }
        debug!(?action, "drag handle action");
        let transition = match action {
            SheetAction::Expand => Some(self.state.expand()),
            SheetAction::Collapse => self.state.partial_expand().ok(),
            SheetAction::Dismiss => return self.user_hide(),
        };
        self.sync();
        transition
    }

    /// Geometry for the current frame, or `None` before the first layout.
    #[must_use]
    pub fn frame(&self) -> Option<SheetFrame> {
        let container = self.container?;
        let offset = self.state.offset()?;
        let density = self.config.density;
        let shape = self.config.shape;
        let params = SurfaceParams {
            container_width: container.width,
            max_width: density.dp_to_px(self.config.max_width),
            corner_radii: RoundedRectRadii::new(
                density.dp_to_px(shape.top_left),
                density.dp_to_px(shape.top_right),
                density.dp_to_px(shape.bottom_right),
                density.dp_to_px(shape.bottom_left),
            ),
            scrim_color: self.config.scrim_color,
            flags: self.config.properties.flags,
            density,
        };
        let insets = self.config.content_insets;
        Some(SheetFrame {
            offset,
            surface: SurfaceFrame::compute(offset, self.state.anchors(), &params),
            content_insets: Insets::new(
                density.dp_to_px(insets.x0),
                density.dp_to_px(insets.y0),
                density.dp_to_px(insets.x1),
                density.dp_to_px(insets.y1),
            ),
            elevation: density.dp_to_px(self.config.elevation),
            container_color: self.config.container_color,
            content_color: self.config.content_color,
            drag_handle: self.config.drag_handle.then(|| {
                Size::new(
                    density.dp_to_px(tokens::DRAG_HANDLE_WIDTH_DP),
                    density.dp_to_px(tokens::DRAG_HANDLE_HEIGHT_DP),
                )
            }),
        })
    }

    /// Drains pending events.
    pub fn take_events(&mut self) -> SmallVec<[SheetEvent; 4]> {
        core::mem::take(&mut self.events)
    }

    fn wants_back(&self) -> bool {
        self.config
            .properties
            .contains(GleamFlags::DISMISS_ON_BACK_PRESS)
            && !self.state.skip_hidden_state()
            && self.state.target_value() != GleamValue::Hidden
    }

    fn user_hide(&mut self) -> Option<Transition> {
        let transition = self.state.hide().ok()?;
        self.track_user_action(&transition);
        Some(transition)
    }

    fn track_user_action(&mut self, transition: &Transition) {
        self.user_action = Some(transition.clone());
        self.sync();
    }

    /// Emits edge events and keeps the back interceptor registered while shown.
    fn sync(&mut self) {
        let visible = self.state.is_visible();
        if visible != self.was_visible {
            self.was_visible = visible;
            self.events.push(SheetEvent::VisibilityChanged { visible });
        }
        if self
            .user_action
            .as_ref()
            .is_some_and(Transition::is_finished)
        {
            self.user_action = None;
            if !visible {
                debug!("user dismissed sheet");
                self.events.push(SheetEvent::DismissRequested);
            }
        }
        let wants_back = self.wants_back();
        self.back.set(wants_back);
    }
}

/// Forwards nested scrolling to the sheet's state and tracks fling releases
/// as user actions.
impl NestedScrollConnection for GleamSheet {
    fn pre_scroll(&mut self, available: Vec2, source: NestedScrollSource) -> Vec2 {
        GleamNestedScroll::new(&mut self.state).pre_scroll(available, source)
    }

    fn post_scroll(&mut self, consumed: Vec2, available: Vec2, source: NestedScrollSource) -> Vec2 {
        GleamNestedScroll::new(&mut self.state).post_scroll(consumed, available, source)
    }

    fn pre_fling(&mut self, available: Vec2) -> Vec2 {
        let consumed = GleamNestedScroll::new(&mut self.state).pre_fling(available);
        self.track_fling(consumed)
    }

    fn post_fling(&mut self, consumed: Vec2, available: Vec2) -> Vec2 {
        let consumed = GleamNestedScroll::new(&mut self.state).post_fling(consumed, available);
        self.track_fling(consumed)
    }
}

impl GleamSheet {
    fn track_fling(&mut self, consumed: Vec2) -> Vec2 {
        if consumed != Vec2::ZERO {
            if let Some(transition) = self.state.transition() {
                self.track_user_action(&transition);
            } else {
                self.sync();
            }
        }
        consumed
    }
}

/// A sheet shown and hidden by a visibility boolean.
///
/// Unlike [`GleamSheet::new`] the scaffold never shows itself on layout.
#[derive(Debug)]
pub struct GleamScaffold {
    sheet: GleamSheet,
    visible: bool,
}

impl GleamScaffold {
    /// Wraps `state`; the sheet follows `state`'s value until
    /// [`GleamScaffold::set_visible`] is called.
    #[must_use]
    pub fn new(state: GleamState, config: GleamSheetConfig) -> Self {
        let visible = state.is_visible();
        Self {
            sheet: GleamSheet::hosted(state, config),
            visible,
        }
    }

    /// The requested visibility.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the sheet. Repeated calls with the same value are no-ops.
    pub fn set_visible(&mut self, visible: bool) -> Result<Option<Transition>, GleamError> {
        if visible == self.visible {
            return Ok(None);
        }
        self.visible = visible;
        let transition = if visible {
            self.sheet.state.show()
        } else {
            self.sheet.state.hide()?
        };
        self.sheet.sync();
        Ok(Some(transition))
    }

    /// The wrapped sheet.
    #[must_use]
    pub fn sheet(&self) -> &GleamSheet {
        &self.sheet
    }

    /// The wrapped sheet, for forwarding input.
    pub fn sheet_mut(&mut self) -> &mut GleamSheet {
        &mut self.sheet
    }

    /// Drains the sheet's events.
    ///
    /// A [`SheetEvent::DismissRequested`] also clears the requested visibility.
    pub fn take_events(&mut self) -> SmallVec<[SheetEvent; 4]> {
        let events = self.sheet.take_events();
        if events.contains(&SheetEvent::DismissRequested) {
            self.visible = false;
        }
        events
    }
}
