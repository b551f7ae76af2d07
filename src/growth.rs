use macroquad::prelude::*;

use crate::config;
use crate::effects::FxQueue;
use crate::entity::Entity;

/// Collision and display radius for a mass-driven entity. Food and powerups
/// own their radius directly and never go through this.
pub fn radius_from_mass(mass: f32) -> f32 {
    config::RADIUS_BASE + mass.sqrt() * config::RADIUS_MASS_SCALE
}

/// Diminishing-returns multiplier: heavier entities gain proportionally less
/// per unit of food or prey. Never drops below the floor, so eating always
/// pays something.
pub fn diminish_gain(mass: f32) -> f32 {
    let k = config::DIMINISH_K;
    (k / (k + mass * config::DIMINISH_MASS_FACTOR)).clamp(config::DIMINISH_FLOOR, 1.0)
}

/// Apply a mass delta through the diminishing-returns curve and keep the
/// radius in sync. Mass never drops below the floor.
pub fn grow(entity: &mut Entity, raw_mass: f32, mult: f32) {
    let gain = raw_mass * mult * diminish_gain(entity.mass);
    entity.mass = (entity.mass + gain).max(config::MASS_FLOOR);
    entity.radius = radius_from_mass(entity.mass);
}

/// Score plus the combo counter that decays shortly after the last gain.
pub struct ScoreBoard {
    pub score: i64,
    pub combo: u32,
    pub combo_timer: f32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            score: 0,
            combo: 0,
            combo_timer: 0.0,
        }
    }

    /// Add points and emit the floating score text. Positive awards extend
    /// the combo; anything else resets it.
    pub fn award(&mut self, points: i64, pos: Vec2, color: Color, fx: &mut FxQueue) {
        self.score += points;
        if points > 0 {
            self.combo += 1;
            self.combo_timer = config::COMBO_WINDOW;
        } else {
            self.combo = 0;
            self.combo_timer = 0.0;
        }
        fx.float_text(format!("{points:+}"), pos, color);
    }

    pub fn tick(&mut self, dt: f32) {
        if self.combo_timer > 0.0 {
            self.combo_timer = (self.combo_timer - dt).max(0.0);
            if self.combo_timer <= 0.0 {
                self.combo = 0;
            }
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.combo = 0;
        self.combo_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_never_drops_below_floor() {
        let mut e = Entity::player(vec2(0.0, 0.0));
        grow(&mut e, -1000.0, 1.0);
        assert_eq!(e.mass, config::MASS_FLOOR);
        assert_eq!(e.radius, radius_from_mass(config::MASS_FLOOR));
    }

    #[test]
    fn radius_tracks_mass_after_growth() {
        let mut e = Entity::player(vec2(0.0, 0.0));
        grow(&mut e, 12.0, 1.0);
        assert!((e.radius - radius_from_mass(e.mass)).abs() < 1e-6);
    }

    #[test]
    fn heavier_entities_gain_less_from_the_same_delta() {
        let mut light = Entity::player(vec2(0.0, 0.0));
        light.mass = 20.0;
        let mut heavy = Entity::player(vec2(0.0, 0.0));
        heavy.mass = 200.0;

        let before_light = light.mass;
        let before_heavy = heavy.mass;
        grow(&mut light, 10.0, 1.0);
        grow(&mut heavy, 10.0, 1.0);

        assert!((light.mass - before_light) > (heavy.mass - before_heavy));
    }

    #[test]
    fn diminish_factor_is_clamped() {
        assert_eq!(diminish_gain(1e9), config::DIMINISH_FLOOR);
        assert!(diminish_gain(0.0) <= 1.0);
    }

    #[test]
    fn combo_counts_gains_and_resets_on_loss() {
        let mut score = ScoreBoard::new();
        let mut fx = FxQueue::new();
        score.award(1, vec2(0.0, 0.0), WHITE, &mut fx);
        score.award(6, vec2(0.0, 0.0), WHITE, &mut fx);
        assert_eq!(score.combo, 2);
        assert_eq!(score.score, 7);

        score.award(-3, vec2(0.0, 0.0), WHITE, &mut fx);
        assert_eq!(score.combo, 0);
        assert_eq!(score.score, 4);
    }

    #[test]
    fn combo_decays_after_the_window() {
        let mut score = ScoreBoard::new();
        let mut fx = FxQueue::new();
        score.award(1, vec2(0.0, 0.0), WHITE, &mut fx);
        score.tick(config::COMBO_WINDOW + 0.01);
        assert_eq!(score.combo, 0);
        assert_eq!(score.combo_timer, 0.0);
    }
}
