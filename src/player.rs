use macroquad::prelude::*;

use crate::config;
use crate::effects::FxQueue;
use crate::entity::{EntityArena, EntityKind, PowerKind};
use crate::growth::{self, ScoreBoard};
use crate::spatial_hash::SpatialHash;
use crate::world::World;

/// Per-frame input snapshot. The presentation layer fills this from whatever
/// event source it has; the core only ever sees plain data.
#[derive(Clone, Debug)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub dash_held: bool,
    pub burst_held: bool,
    /// Pointer offset from the viewport center in screen pixels, when the
    /// pointer is inside the viewport.
    pub aim: Option<Vec2>,
    /// Distance at which the aim factor saturates in variable-speed mode.
    pub aim_range: f32,
    pub viewport: Vec2,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            dash_held: false,
            burst_held: false,
            aim: None,
            aim_range: 288.0,
            viewport: vec2(800.0, 600.0),
        }
    }
}

/// Ability cooldowns and active-effect timers. Each ability runs its own
/// independent timer pair; there is no combined state machine.
pub struct AbilityState {
    pub dash_cd: f32,
    pub shield_cd: f32,
    pub shield_time: f32,
    pub bomb_cd: f32,
    pub bomb_charges: u32,
    pub magnet_time: f32,
    pub magnet_cd: f32,
    pub burst_active: bool,
    pub burst_energy: f32,
}

impl AbilityState {
    pub fn new() -> Self {
        Self {
            dash_cd: 0.0,
            shield_cd: 0.0,
            shield_time: 0.0,
            bomb_cd: 0.0,
            bomb_charges: 0,
            magnet_time: 0.0,
            magnet_cd: 0.0,
            burst_active: false,
            burst_energy: 1.0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Decrement every timer, flooring at zero.
    pub fn tick(&mut self, dt: f32) {
        self.dash_cd = (self.dash_cd - dt).max(0.0);
        self.shield_cd = (self.shield_cd - dt).max(0.0);
        self.bomb_cd = (self.bomb_cd - dt).max(0.0);
        self.magnet_cd = (self.magnet_cd - dt).max(0.0);
        self.shield_time = (self.shield_time - dt).max(0.0);
        self.magnet_time = (self.magnet_time - dt).max(0.0);
    }

    pub fn shield_active(&self) -> bool {
        self.shield_time > 0.0
    }

    pub fn magnet_active(&self) -> bool {
        self.magnet_time > 0.0
    }

    pub fn shield_ready(&self) -> bool {
        self.shield_cd <= 0.0 && self.shield_time <= 0.0
    }
}

pub fn player_speed(mass: f32) -> f32 {
    (config::PLAYER_SPEED_BASE - mass.sqrt() * config::PLAYER_SPEED_SLOPE)
        .clamp(config::PLAYER_SPEED_MIN, config::PLAYER_SPEED_MAX)
}

/// One player tick: ability timers, burst economy, input-to-velocity
/// blending, dash, integration and bounds clamping.
pub fn update_player(
    arena: &mut EntityArena,
    world: &World,
    abilities: &mut AbilityState,
    input: &InputState,
    variable_mouse_speed: bool,
    fx: &mut FxQueue,
    dt: f32,
) {
    let Some(pid) = arena.player_id() else {
        return;
    };

    abilities.tick(dt);

    let Some(p) = arena.get_mut(pid) else {
        return;
    };

    // Burst is held, not toggled: drains energy and a little mass while the
    // conditions hold, regenerates otherwise.
    if input.burst_held && abilities.burst_energy > 0.0 && p.mass > config::BURST_MIN_MASS {
        abilities.burst_active = true;
        abilities.burst_energy =
            (abilities.burst_energy - config::BURST_DRAIN_PER_SEC * dt).max(0.0);
        p.mass = (p.mass - config::BURST_MASS_COST_PER_SEC * dt).max(config::BURST_MIN_MASS);
        p.radius = growth::radius_from_mass(p.mass);
    } else {
        abilities.burst_active = false;
        abilities.burst_energy =
            (abilities.burst_energy + config::BURST_REGEN_PER_SEC * dt).min(1.0);
    }

    let mut dir = Vec2::ZERO;
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }

    let mut aim_factor = 1.0;
    if let Some(offset) = input.aim {
        let dist = offset.length();
        if variable_mouse_speed {
            aim_factor = (dist / input.aim_range.max(1.0)).clamp(config::AIM_DEADZONE_FACTOR, 1.0);
        }
        if dist > f32::EPSILON {
            let pointer_dir = offset / dist;
            if dir == Vec2::ZERO {
                dir = pointer_dir;
            } else {
                // Keyboard dominates, the pointer nudges.
                dir = dir.normalize_or_zero() * 0.85 + pointer_dir * 0.15;
            }
        }
    }
    dir = dir.normalize_or_zero();

    let mut speed = player_speed(p.mass) * aim_factor;

    if input.dash_held && abilities.dash_cd <= 0.0 {
        abilities.dash_cd = config::DASH_COOLDOWN;
        speed *= config::DASH_BOOST;
        fx.burst(p.pos, p.color);
        fx.float_text("DASH", p.pos, config::FX_INFO);
    }
    if abilities.burst_active {
        speed *= config::BURST_BOOST;
    }

    let desired = dir * speed;
    p.vel += (desired - p.vel) * config::PLAYER_VEL_LERP;
    p.pos += p.vel * dt;
    p.pos = world.clamp_circle(p.pos, p.radius);
}

/// Raise the shield if it is off cooldown. Silent no-op otherwise.
pub fn activate_shield(arena: &EntityArena, abilities: &mut AbilityState, fx: &mut FxQueue) {
    let Some(p) = arena.player_id().and_then(|id| arena.get(id)) else {
        return;
    };
    if abilities.shield_cd > 0.0 {
        return;
    }
    abilities.shield_time = config::SHIELD_DURATION;
    abilities.shield_cd = config::SHIELD_COOLDOWN;
    fx.burst(p.pos, config::FX_SCORE);
    fx.float_text("SHIELD", p.pos, config::FX_SCORE);
}

/// Detonate a bomb around the player: consumes a charge and clears food and
/// beatable bots within the blast radius. Silent no-op without a charge or
/// while on cooldown.
pub fn activate_bomb(
    arena: &mut EntityArena,
    spatial: &SpatialHash,
    abilities: &mut AbilityState,
    score: &mut ScoreBoard,
    fx: &mut FxQueue,
) {
    let Some(pid) = arena.player_id() else {
        return;
    };
    let (ppos, pmass) = match arena.get(pid) {
        Some(p) => (p.pos, p.mass),
        None => return,
    };
    if abilities.bomb_cd > 0.0 || abilities.bomb_charges == 0 {
        return;
    }
    abilities.bomb_charges -= 1;
    abilities.bomb_cd = config::BOMB_COOLDOWN;

    let r2 = config::BOMB_RADIUS * config::BOMB_RADIUS;
    let targets: Vec<u32> = spatial.neighbors(ppos).collect();
    for idx in targets {
        let idx = idx as usize;
        if idx == pid.index as usize {
            continue;
        }
        let Some(e) = arena.get_by_index(idx) else {
            continue;
        };
        if !e.alive || ppos.distance_squared(e.pos) > r2 {
            continue;
        }
        let (pos, color) = (e.pos, e.color);
        match e.kind {
            EntityKind::Food => {
                score.award(config::SCORE_BOMB_FOOD, pos, config::FX_GOLD, fx);
            }
            EntityKind::Bot if pmass >= e.mass * config::BOMB_BEATABLE_RATIO => {
                score.award(config::SCORE_BOMB_BOT, pos, config::FX_GOLD, fx);
            }
            _ => continue,
        }
        if let Some(victim) = arena.get_mut_by_index(idx) {
            victim.alive = false;
        }
        fx.burst(pos, color);
    }

    fx.burst(ppos, config::FX_GOLD);
    fx.float_text("BOMB", ppos, config::FX_GOLD);
}

/// Apply a consumed powerup to the ability state and award its score.
pub fn apply_powerup(
    kind: PowerKind,
    pos: Vec2,
    color: Color,
    abilities: &mut AbilityState,
    score: &mut ScoreBoard,
    fx: &mut FxQueue,
) {
    match kind {
        PowerKind::Dash => {
            abilities.dash_cd = (abilities.dash_cd - config::PICKUP_DASH_REFUND).max(0.0);
            fx.float_text("DASH+", pos, config::FX_GOLD);
        }
        PowerKind::Shield => {
            abilities.shield_cd = (abilities.shield_cd - config::PICKUP_SHIELD_REFUND).max(0.0);
            fx.float_text("SHIELD+", pos, config::FX_SCORE);
        }
        PowerKind::Bomb => {
            abilities.bomb_charges = (abilities.bomb_charges + 1).min(config::BOMB_CHARGE_CAP);
            fx.float_text("BOMB+1", pos, config::FX_DANGER);
        }
        PowerKind::Magnet => {
            abilities.magnet_time = abilities.magnet_time.max(config::MAGNET_DURATION);
            abilities.magnet_cd = abilities.magnet_cd.max(config::MAGNET_COOLDOWN);
            fx.float_text("MAGNET", pos, config::FX_INFO);
        }
    }
    fx.burst(pos, color);
    score.award(config::SCORE_POWERUP, pos, config::FX_GOLD, fx);
}
