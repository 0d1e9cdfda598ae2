//! 2D camera used to project world-space targets onto the screen.
//!
//! Screen origin is top-left, Y increases downward. World Y also increases
//! downward so the two spaces only differ by translation and zoom.

use glam::Vec2;

/// Minimum zoom level (zoomed out).
pub const MIN_ZOOM: f32 = 0.25;

/// Maximum zoom level (zoomed in).
pub const MAX_ZOOM: f32 = 20.0;

/// Default zoom level.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// 2D camera for viewing the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world coordinates (center of view).
    pub position: Vec2,
    /// Zoom level (1.0 = 1:1 pixel mapping).
    pub zoom: f32,
    /// Viewport size in screen pixels.
    pub viewport_size: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Camera {
    /// Creates a new camera with the given viewport size.
    #[must_use]
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
            viewport_size: Vec2::new(viewport_width, viewport_height),
        }
    }

    /// Move camera by delta in world units.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Set absolute zoom level (clamped).
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Center camera on world position.
    pub fn center_on(&mut self, world: Vec2) {
        self.position = world;
    }

    /// Set the viewport size.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_size = Vec2::new(width, height);
    }

    /// Convert screen coordinates to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.position + (screen - self.viewport_size * 0.5) / self.zoom
    }

    /// Convert world coordinates to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom + self.viewport_size * 0.5
    }

    /// Check if a world point is visible on screen.
    #[must_use]
    pub fn is_visible(&self, world: Vec2) -> bool {
        let screen = self.world_to_screen(world);
        screen.x >= 0.0
            && screen.y >= 0.0
            && screen.x <= self.viewport_size.x
            && screen.y <= self.viewport_size.y
    }
}
