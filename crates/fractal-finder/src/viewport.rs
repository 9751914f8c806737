//! Screen to fractal-plane mapping.
//!
//! The live view shows the square `[pan - zoom, pan + zoom]` of the plane
//! stretched over the view rectangle; screen +Y maps to plane +Y.

use finder_engine::coords::Vec2;

use crate::config::{DEFAULT_ZOOM, ZOOM_BASE};
use crate::levels::Target;

/// Zoom and pan of the live view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Half-extent of the plane visible across the view. Always > 0.
    pub zoom: f32,
    /// Plane point shown at the view center.
    pub pan: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: Vec2::zero(),
        }
    }
}

impl Camera {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Maps a view-local pixel position onto the plane.
    pub fn screen_to_world(&self, p: Vec2, view_size: Vec2) -> Vec2 {
        Vec2::new(
            p.x * (2.0 * self.zoom / view_size.x) - self.zoom + self.pan.x,
            p.y * (2.0 * self.zoom / view_size.y) - self.zoom + self.pan.y,
        )
    }

    /// Applies `lines` of wheel motion; positive zooms in.
    ///
    /// The half-extent is clamped to `[f32::MIN_POSITIVE, f32::MAX]`, so once
    /// it reaches the floor further zooming in leaves it unchanged rather than
    /// shrinking it.
    pub fn zoom_by_scroll(&mut self, lines: f32) {
        if lines == 0.0 || !lines.is_finite() {
            return;
        }
        self.zoom = (self.zoom * ZOOM_BASE.powf(lines)).clamp(f32::MIN_POSITIVE, f32::MAX);
    }

    /// Moves the view by a pointer drag of `delta` pixels.
    pub fn pan_by_drag(&mut self, delta: Vec2, view_size: Vec2) {
        self.pan += Vec2::new(
            delta.x * (2.0 * self.zoom / view_size.x),
            delta.y * (2.0 * self.zoom / view_size.y),
        );
    }
}

/// True when `world` is close enough to `target` to count as finding it.
pub fn is_hit(world: Vec2, target: &Target) -> bool {
    world.distance(target.center) <= target.half_width / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    fn assert_near(a: Vec2, b: Vec2) {
        assert!((a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn view_center_maps_to_pan() {
        let cam = Camera::default();
        assert_near(cam.screen_to_world(Vec2::new(400.0, 300.0), VIEW), Vec2::zero());

        let cam = Camera { zoom: 0.5, pan: Vec2::new(-1.0, 0.25) };
        assert_near(cam.screen_to_world(Vec2::new(400.0, 300.0), VIEW), Vec2::new(-1.0, 0.25));
    }

    #[test]
    fn view_corners_map_to_extent() {
        let cam = Camera::default();
        assert_near(cam.screen_to_world(Vec2::zero(), VIEW), Vec2::new(-2.0, -2.0));
        assert_near(cam.screen_to_world(VIEW, VIEW), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn click_on_center_is_a_hit() {
        let cam = Camera::default();
        let world = cam.screen_to_world(Vec2::new(400.0, 300.0), VIEW);
        assert!(is_hit(world, &Target::new(0.0, 0.0, 0.01)));
    }

    #[test]
    fn hit_radius_is_half_the_half_width() {
        let t = Target::new(1.0, -1.0, 0.2);
        assert!(is_hit(Vec2::new(1.09, -1.0), &t));
        assert!(!is_hit(Vec2::new(1.1001, -1.0), &t));
    }

    #[test]
    fn one_line_of_scroll_scales_by_base() {
        let mut cam = Camera::default();
        cam.zoom_by_scroll(1.0);
        assert!((cam.zoom - 1.8).abs() < 1e-6);
        cam.zoom_by_scroll(-1.0);
        assert!((cam.zoom - 2.0).abs() < 1e-6);
    }

    #[test]
    fn drag_moves_pan_proportionally_to_zoom() {
        let mut cam = Camera::default();
        cam.pan_by_drag(Vec2::new(200.0, -150.0), VIEW);
        assert_near(cam.pan, Vec2::new(1.0, -1.0));

        cam.zoom = 0.5;
        cam.pan_by_drag(Vec2::new(200.0, 0.0), VIEW);
        assert_near(cam.pan, Vec2::new(1.25, -1.0));
    }

    #[test]
    fn zoom_holds_at_the_floor() {
        let mut cam = Camera { zoom: f32::MIN_POSITIVE, pan: Vec2::zero() };
        cam.zoom_by_scroll(5.0);
        assert_eq!(cam.zoom, f32::MIN_POSITIVE);
        cam.zoom_by_scroll(-1.0);
        assert!(cam.zoom > f32::MIN_POSITIVE);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut cam = Camera { zoom: 0.001, pan: Vec2::new(3.0, 4.0) };
        cam.reset();
        assert_eq!(cam, Camera::default());
    }

    proptest! {
        #[test]
        fn scrolling_in_shrinks_and_out_grows(zoom in 1e-6f32..10.0, lines in 0.1f32..10.0) {
            let mut cam = Camera { zoom, pan: Vec2::zero() };
            cam.zoom_by_scroll(lines);
            prop_assert!(cam.zoom < zoom);
            prop_assert!(cam.zoom > 0.0);

            let mut cam = Camera { zoom, pan: Vec2::zero() };
            cam.zoom_by_scroll(-lines);
            prop_assert!(cam.zoom > zoom);
        }

        #[test]
        fn zoom_never_reaches_zero(steps in prop::collection::vec(-50.0f32..50.0, 1..64)) {
            let mut cam = Camera::default();
            for s in steps {
                cam.zoom_by_scroll(s);
                prop_assert!(cam.zoom > 0.0 && cam.zoom.is_finite());
            }
        }

        #[test]
        fn miss_just_outside_radius(half in 1e-4f32..1.0, angle in 0.0f32..std::f32::consts::TAU) {
            let t = Target::new(0.3, -0.7, half);
            let r = half / 2.0 * 1.01;
            let p = Vec2::new(0.3 + r * angle.cos(), -0.7 + r * angle.sin());
            prop_assert!(!is_hit(p, &t));
        }
    }
}
