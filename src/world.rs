use macroquad::prelude::*;

use crate::config;

/// Bounded rectangular arena. Entities never leave it; positions are clamped
/// so the whole circle stays inside.
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_preset(preset: WorldPreset) -> Self {
        let size = preset.size();
        Self::new(size.x, size.y)
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    /// Clamp a circle of the given radius fully inside the arena.
    pub fn clamp_circle(&self, pos: Vec2, radius: f32) -> Vec2 {
        vec2(
            pos.x.clamp(radius, self.width - radius),
            pos.y.clamp(radius, self.height - radius),
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WorldPreset {
    Small,
    Medium,
    Large,
}

impl WorldPreset {
    pub fn size(self) -> Vec2 {
        match self {
            WorldPreset::Small => vec2(config::WORLD_SMALL_W, config::WORLD_SMALL_H),
            WorldPreset::Medium => vec2(config::WORLD_MEDIUM_W, config::WORLD_MEDIUM_H),
            WorldPreset::Large => vec2(config::WORLD_LARGE_W, config::WORLD_LARGE_H),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorldPreset::Small => "Small",
            WorldPreset::Medium => "Medium",
            WorldPreset::Large => "Large",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_circle_inside_bounds() {
        let world = World::new(1000.0, 800.0);
        let p = world.clamp_circle(vec2(-50.0, 900.0), 20.0);
        assert_eq!(p, vec2(20.0, 780.0));

        let inside = world.clamp_circle(vec2(400.0, 300.0), 20.0);
        assert_eq!(inside, vec2(400.0, 300.0));
    }

    #[test]
    fn presets_grow_from_small_to_large() {
        let s = WorldPreset::Small.size();
        let m = WorldPreset::Medium.size();
        let l = WorldPreset::Large.size();
        assert!(s.x < m.x && m.x < l.x);
        assert!(s.y < m.y && m.y < l.y);
    }
}
