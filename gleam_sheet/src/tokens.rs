// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Design tokens for sheets and their lookup into a theme.
//!
//! Tokens are closed enums; resolving one is a pure table lookup. Shapes
//! resolve in density-independent units and are scaled by the caller.

use kurbo::RoundedRectRadii;
use peniko::Color;

/// Default elevation of a modal sheet, in dp.
pub const SHEET_ELEVATION_DP: f64 = 1.0;
/// Default maximum width of a modal sheet, in dp.
pub const SHEET_MAX_WIDTH_DP: f64 = 640.0;
/// Opacity of the scrim color behind a fully shown sheet.
pub const SCRIM_OPACITY: f32 = 0.32;
/// Size of the default drag handle, in dp.
pub const DRAG_HANDLE_WIDTH_DP: f64 = 32.0;
/// Height of the default drag handle, in dp.
pub const DRAG_HANDLE_HEIGHT_DP: f64 = 4.0;

/// Shape roles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeToken {
    /// Square corners.
    CornerNone,
    /// Extra small rounding on all corners.
    ExtraSmall,
    /// Small rounding on all corners.
    Small,
    /// Medium rounding on all corners.
    Medium,
    /// Large rounding on all corners.
    Large,
    /// Extra large rounding on all corners.
    ExtraLarge,
    /// Extra large rounding on the top corners only. The sheet container shape.
    ExtraLargeTop,
}

/// Color roles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorToken {
    /// Base surface.
    Surface,
    /// Low-emphasis container surface. The sheet container color.
    SurfaceContainerLow,
    /// Content on a surface.
    OnSurface,
    /// Secondary content on a surface, such as the drag handle.
    OnSurfaceVariant,
    /// Scrim behind modal surfaces, before [`SCRIM_OPACITY`] is applied.
    Scrim,
}

/// Corner sizes per shape role, in dp.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShapeScheme {
    /// Radius for [`ShapeToken::ExtraSmall`].
    pub extra_small: f64,
    /// Radius for [`ShapeToken::Small`].
    pub small: f64,
    /// Radius for [`ShapeToken::Medium`].
    pub medium: f64,
    /// Radius for [`ShapeToken::Large`].
    pub large: f64,
    /// Radius for [`ShapeToken::ExtraLarge`] and [`ShapeToken::ExtraLargeTop`].
    pub extra_large: f64,
}

impl Default for ShapeScheme {
    fn default() -> Self {
        Self {
            extra_small: 4.0,
            small: 8.0,
            medium: 12.0,
            large: 16.0,
            extra_large: 28.0,
        }
    }
}

impl ShapeScheme {
    /// Resolves a shape token to corner radii in dp.
    #[must_use]
    pub fn resolve(&self, token: ShapeToken) -> RoundedRectRadii {
        match token {
            ShapeToken::CornerNone => RoundedRectRadii::from_single_radius(0.0),
            ShapeToken::ExtraSmall => RoundedRectRadii::from_single_radius(self.extra_small),
            ShapeToken::Small => RoundedRectRadii::from_single_radius(self.small),
            ShapeToken::Medium => RoundedRectRadii::from_single_radius(self.medium),
            ShapeToken::Large => RoundedRectRadii::from_single_radius(self.large),
            ShapeToken::ExtraLarge => RoundedRectRadii::from_single_radius(self.extra_large),
            ShapeToken::ExtraLargeTop => {
                RoundedRectRadii::new(self.extra_large, self.extra_large, 0.0, 0.0)
            }
        }
    }
}

/// Colors per color role.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorScheme {
    /// [`ColorToken::Surface`].
    pub surface: Color,
    /// [`ColorToken::SurfaceContainerLow`].
    pub surface_container_low: Color,
    /// [`ColorToken::OnSurface`].
    pub on_surface: Color,
    /// [`ColorToken::OnSurfaceVariant`].
    pub on_surface_variant: Color,
    /// [`ColorToken::Scrim`].
    pub scrim: Color,
}

impl ColorScheme {
    /// Baseline light scheme.
    pub const LIGHT: Self = Self {
        surface: Color::from_rgb8(0xFE, 0xF7, 0xFF),
        surface_container_low: Color::from_rgb8(0xF7, 0xF2, 0xFA),
        on_surface: Color::from_rgb8(0x1D, 0x1B, 0x20),
        on_surface_variant: Color::from_rgb8(0x49, 0x45, 0x4F),
        scrim: Color::from_rgb8(0x00, 0x00, 0x00),
    };

    /// Baseline dark scheme.
    pub const DARK: Self = Self {
        surface: Color::from_rgb8(0x14, 0x12, 0x18),
        surface_container_low: Color::from_rgb8(0x1D, 0x1B, 0x20),
        on_surface: Color::from_rgb8(0xE6, 0xE0, 0xE9),
        on_surface_variant: Color::from_rgb8(0xCA, 0xC4, 0xD0),
        scrim: Color::from_rgb8(0x00, 0x00, 0x00),
    };

    /// Resolves a color token.
    #[must_use]
    pub fn resolve(&self, token: ColorToken) -> Color {
        match token {
            ColorToken::Surface => self.surface,
            ColorToken::SurfaceContainerLow => self.surface_container_low,
            ColorToken::OnSurface => self.on_surface,
            ColorToken::OnSurfaceVariant => self.on_surface_variant,
            ColorToken::Scrim => self.scrim,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::LIGHT
    }
}

/// Shapes and colors used to resolve sheet tokens.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GleamTheme {
    /// Shape roles.
    pub shapes: ShapeScheme,
    /// Color roles.
    pub colors: ColorScheme,
}

impl GleamTheme {
    /// Light theme with default shapes.
    #[must_use]
    pub fn light() -> Self {
        Self::default()
    }

    /// Dark theme with default shapes.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            shapes: ShapeScheme::default(),
            colors: ColorScheme::DARK,
        }
    }

    /// Resolves a shape token, in dp.
    #[must_use]
    pub fn shape(&self, token: ShapeToken) -> RoundedRectRadii {
        self.shapes.resolve(token)
    }

    /// Resolves a color token.
    #[must_use]
    pub fn color(&self, token: ColorToken) -> Color {
        self.colors.resolve(token)
    }

    /// The scrim color with [`SCRIM_OPACITY`] applied.
    #[must_use]
    pub fn scrim(&self) -> Color {
        self.color(ColorToken::Scrim).multiply_alpha(SCRIM_OPACITY)
    }
}
