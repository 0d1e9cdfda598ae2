//! Coordinate resolver: where in overlay space a popup appears.
//!
//! Resolution happens when a popup is dequeued, never when it is enqueued,
//! so the anchor tracks a target that moved while its popup was queued.

use ember_common::{OverlayPoint, TargetFootprint, TargetLookup, TargetRef, Viewport};
use glam::Vec2;

use crate::camera::Camera;

/// Resolved anchor plus how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Overlay-space point
    pub point: OverlayPoint,
    /// True when the target was absent and the viewport center was used
    pub fallback: bool,
}

/// Computes popup anchors and applies horizontal jitter.
#[derive(Debug, Clone)]
pub struct CoordinateResolver {
    jitter_x: f32,
    rng: fastrand::Rng,
}

impl CoordinateResolver {
    /// Creates a resolver with the given jitter bound (overlay units).
    #[must_use]
    pub fn new(jitter_x: f32) -> Self {
        Self {
            jitter_x: jitter_x.abs(),
            rng: fastrand::Rng::new(),
        }
    }

    /// Creates a resolver with a fixed RNG seed.
    #[must_use]
    pub fn with_seed(jitter_x: f32, seed: u64) -> Self {
        Self {
            jitter_x: jitter_x.abs(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Jitter bound.
    #[must_use]
    pub const fn jitter_x(&self) -> f32 {
        self.jitter_x
    }

    /// Anchor for `target` without jitter.
    ///
    /// - Overlay element: center of its bounding box in overlay space, raised
    ///   by half its height.
    /// - World entity: its position projected through the camera.
    /// - Absent target: center of the viewport.
    #[must_use]
    pub fn base_anchor(
        target: TargetRef,
        targets: &dyn TargetLookup,
        camera: &Camera,
        viewport: &Viewport,
    ) -> Anchor {
        match targets.resolve(target) {
            Some(TargetFootprint::Overlay(rect)) => {
                let rect = viewport.rect_to_overlay(rect);
                Anchor {
                    point: rect.center() - Vec2::new(0.0, rect.height * 0.5),
                    fallback: false,
                }
            },
            Some(TargetFootprint::World(position)) => Anchor {
                point: viewport.screen_to_overlay(camera.world_to_screen(position)),
                fallback: false,
            },
            None => Anchor {
                point: viewport.overlay_center(),
                fallback: true,
            },
        }
    }

    /// Anchor for `target` with a random horizontal offset in `±jitter_x`.
    pub fn resolve(
        &mut self,
        target: TargetRef,
        targets: &dyn TargetLookup,
        camera: &Camera,
        viewport: &Viewport,
    ) -> Anchor {
        let mut anchor = Self::base_anchor(target, targets, camera, viewport);
        anchor.point.x += self.jitter();
        anchor
    }

    fn jitter(&mut self) -> f32 {
        if self.jitter_x <= 0.0 {
            return 0.0;
        }
        (self.rng.f32() * 2.0 - 1.0) * self.jitter_x
    }
}

impl Default for CoordinateResolver {
    fn default() -> Self {
        Self::new(crate::settings::PopupSettings::default().jitter_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::{EntityId, NoTargets, ScreenRect};

    struct Fixed(EntityId, TargetFootprint);

    impl TargetLookup for Fixed {
        fn footprint(&self, id: EntityId) -> Option<TargetFootprint> {
            (id == self.0).then_some(self.1)
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 1.0)
    }

    #[test]
    fn test_absent_target_uses_viewport_center() {
        let anchor = CoordinateResolver::base_anchor(
            EntityId::new().into(),
            &NoTargets,
            &Camera::new(800.0, 600.0),
            &viewport(),
        );
        assert!(anchor.fallback);
        assert_eq!(anchor.point, Vec2::new(400.0, 300.0));
        assert!(viewport().overlay_bounds().contains(anchor.point));
    }

    #[test]
    fn test_unset_target_uses_viewport_center() {
        let anchor = CoordinateResolver::base_anchor(
            TargetRef::none(),
            &NoTargets,
            &Camera::default(),
            &Viewport::new(1920.0, 1080.0, 2.0),
        );
        assert_eq!(anchor.point, Vec2::new(480.0, 270.0));
    }

    #[test]
    fn test_overlay_target_is_raised_by_half_height() {
        let id = EntityId::new();
        let lookup = Fixed(id, TargetFootprint::Overlay(ScreenRect::new(100.0, 100.0, 80.0, 120.0)));
        let anchor =
            CoordinateResolver::base_anchor(id.into(), &lookup, &Camera::default(), &viewport());
        assert!(!anchor.fallback);
        // Center (140, 160) raised by 60 lands on the top edge.
        assert_eq!(anchor.point, Vec2::new(140.0, 100.0));
    }

    #[test]
    fn test_overlay_target_respects_ui_scale() {
        let id = EntityId::new();
        let lookup = Fixed(id, TargetFootprint::Overlay(ScreenRect::new(200.0, 200.0, 100.0, 100.0)));
        let anchor = CoordinateResolver::base_anchor(
            id.into(),
            &lookup,
            &Camera::default(),
            &Viewport::new(1600.0, 1200.0, 2.0),
        );
        assert_eq!(anchor.point, Vec2::new(125.0, 100.0));
    }

    #[test]
    fn test_world_target_is_projected() {
        let id = EntityId::new();
        let lookup = Fixed(id, TargetFootprint::World(Vec2::new(50.0, -20.0)));
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_zoom(2.0);
        let anchor = CoordinateResolver::base_anchor(id.into(), &lookup, &camera, &viewport());
        assert_eq!(anchor.point, Vec2::new(500.0, 260.0));
    }

    #[test]
    fn test_jitter_stays_within_bound() {
        let mut resolver = CoordinateResolver::with_seed(20.0, 7);
        let camera = Camera::new(800.0, 600.0);
        let mut saw_offset = false;
        for _ in 0..200 {
            let anchor = resolver.resolve(TargetRef::none(), &NoTargets, &camera, &viewport());
            let dx = anchor.point.x - 400.0;
            assert!(dx.abs() <= 20.0);
            assert!((anchor.point.y - 300.0).abs() < f32::EPSILON);
            saw_offset |= dx.abs() > 0.5;
        }
        assert!(saw_offset);
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let mut resolver = CoordinateResolver::with_seed(0.0, 1);
        let anchor =
            resolver.resolve(TargetRef::none(), &NoTargets, &Camera::default(), &viewport());
        assert_eq!(anchor.point, Vec2::new(400.0, 300.0));
    }
}
