use macroquad::prelude::*;

use crate::config;

/// Follows the player with smoothing. Zoom is derived from player mass
/// (growing zooms out) plus a bounded wheel offset.
pub struct Camera {
    /// Top-left corner of the view in world coordinates.
    pub pos: Vec2,
    target: Vec2,
    pub zoom: f32,
    pub wheel_zoom: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            target: Vec2::ZERO,
            zoom: 1.0,
            wheel_zoom: 0.0,
        }
    }

    pub fn zoom_for_mass(mass: f32) -> f32 {
        (config::ZOOM_BASE - mass.sqrt() * config::ZOOM_MASS_SLOPE)
            .clamp(config::ZOOM_MASS_MIN, config::ZOOM_MASS_MAX)
    }

    /// Accumulate a wheel notch. Scrolling up zooms in.
    pub fn add_wheel(&mut self, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let delta = scroll.signum() * config::WHEEL_ZOOM_STEP;
        self.wheel_zoom =
            (self.wheel_zoom + delta).clamp(-config::WHEEL_ZOOM_RANGE, config::WHEEL_ZOOM_RANGE);
    }

    /// Track the focus entity. With no focus (player dead) the camera holds
    /// its last frame.
    pub fn update(&mut self, focus: Option<(Vec2, f32)>, viewport: Vec2) {
        let Some((pos, mass)) = focus else {
            return;
        };
        self.zoom = (Self::zoom_for_mass(mass) + self.wheel_zoom)
            .clamp(config::ZOOM_MIN, config::ZOOM_MAX);
        let want = pos - viewport / (2.0 * self.zoom);
        self.target += (want - self.target) * config::CAMERA_LERP;
        self.pos = self.target;
    }

    /// Jump straight to a focus position without smoothing (world resets).
    pub fn snap_to(&mut self, pos: Vec2, viewport: Vec2) {
        self.target = pos - viewport / (2.0 * self.zoom);
        self.pos = self.target;
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen / self.zoom + self.pos
    }

    /// World point at the middle of the view, for building a render camera.
    pub fn view_center(&self, viewport: Vec2) -> Vec2 {
        self.pos + viewport / (2.0 * self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_shrinks_as_mass_grows_within_bounds() {
        assert!(Camera::zoom_for_mass(24.0) > Camera::zoom_for_mass(400.0));
        assert_eq!(Camera::zoom_for_mass(1e9), config::ZOOM_MASS_MIN);
        assert!(Camera::zoom_for_mass(0.0) <= config::ZOOM_MASS_MAX);
    }

    #[test]
    fn wheel_offset_is_bounded() {
        let mut cam = Camera::new();
        for _ in 0..100 {
            cam.add_wheel(1.0);
        }
        assert_eq!(cam.wheel_zoom, config::WHEEL_ZOOM_RANGE);
        for _ in 0..200 {
            cam.add_wheel(-1.0);
        }
        assert_eq!(cam.wheel_zoom, -config::WHEEL_ZOOM_RANGE);
    }

    #[test]
    fn screen_world_round_trip() {
        let mut cam = Camera::new();
        let viewport = vec2(800.0, 600.0);
        for _ in 0..200 {
            cam.update(Some((vec2(1000.0, 700.0), 24.0)), viewport);
        }
        let screen = vec2(120.0, 80.0);
        let world = cam.screen_to_world(screen);
        let back = (world - cam.pos) * cam.zoom;
        assert!((back - screen).length() < 1e-3);
    }

    #[test]
    fn camera_holds_still_without_a_focus() {
        let mut cam = Camera::new();
        let viewport = vec2(800.0, 600.0);
        cam.update(Some((vec2(500.0, 500.0), 24.0)), viewport);
        let pos = cam.pos;
        cam.update(None, viewport);
        assert_eq!(cam.pos, pos);
    }
}
