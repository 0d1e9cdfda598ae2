//! Overlay and screen geometry.
//!
//! Screen and overlay space share the same convention: origin at the
//! top-left corner, X grows right, Y grows downward. "Up" is negative Y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Point in overlay space.
pub type OverlayPoint = Vec2;

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ScreenRect {
    /// Creates a new rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Top-left corner.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Whether the point lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

/// Visible overlay area.
///
/// The overlay is a fixed 2D canvas laid over the screen. `scale` is the
/// number of screen pixels per overlay unit (UI scale factor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen width in pixels
    pub width: f32,
    /// Screen height in pixels
    pub height: f32,
    /// Screen pixels per overlay unit
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Creates a viewport. Non-positive scales are treated as 1.0.
    #[must_use]
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            scale: if scale > 0.0 { scale } else { 1.0 },
        }
    }

    /// Converts a screen-space point into overlay space.
    #[must_use]
    pub fn screen_to_overlay(&self, screen: Vec2) -> OverlayPoint {
        screen / self.scale
    }

    /// Converts a screen-space rectangle into overlay space.
    #[must_use]
    pub fn rect_to_overlay(&self, rect: ScreenRect) -> ScreenRect {
        ScreenRect::new(
            rect.x / self.scale,
            rect.y / self.scale,
            rect.width / self.scale,
            rect.height / self.scale,
        )
    }

    /// Size of the overlay in overlay units.
    #[must_use]
    pub fn overlay_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / self.scale
    }

    /// Center of the overlay in overlay units.
    #[must_use]
    pub fn overlay_center(&self) -> OverlayPoint {
        self.overlay_size() * 0.5
    }

    /// Overlay bounds as a rectangle in overlay units.
    #[must_use]
    pub fn overlay_bounds(&self) -> ScreenRect {
        let size = self.overlay_size();
        ScreenRect::new(0.0, 0.0, size.x, size.y)
    }
}
