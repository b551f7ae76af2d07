use macroquad::prelude::*;
use ::rand::Rng;

use crate::config;
use crate::entity::{Entity, EntityArena, EntityId, PowerKind};
use crate::world::World;

/// Live-tunable population caps. Enforced at spawn time only; lowering a cap
/// never culls existing entities.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    pub food: usize,
    pub bots: usize,
    pub powerups: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            food: config::FOOD_LIMIT,
            bots: config::BOT_LIMIT,
            powerups: config::POWERUP_LIMIT,
        }
    }
}

/// Millisecond accumulators, one per spawn stream. Accumulation rather than
/// scheduling: a long frame still fires each stream at most once but never
/// loses the leftover time.
pub struct SpawnTimers {
    pub food: f32,
    pub bot: f32,
    pub power: f32,
    pub threat: f32,
}

impl SpawnTimers {
    pub fn new() -> Self {
        Self {
            food: 0.0,
            bot: 0.0,
            power: 0.0,
            threat: 0.0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

pub fn pick<T: Copy>(items: &[T], rng: &mut impl Rng) -> T {
    items[rng.gen_range(0..items.len())]
}

pub fn spawn_player(arena: &mut EntityArena, world: &World) -> Option<EntityId> {
    arena.spawn(Entity::player(world.center()))
}

/// Spawn up to `count` pellets; requests beyond the cap are truncated.
/// Returns how many were actually created.
pub fn spawn_food(
    arena: &mut EntityArena,
    world: &World,
    limits: &Limits,
    rng: &mut impl Rng,
    count: usize,
) -> usize {
    let free = limits.food.saturating_sub(arena.food().len());
    let n = count.min(free);
    for _ in 0..n {
        let pos = vec2(
            rng.gen_range(config::FOOD_MARGIN..world.width - config::FOOD_MARGIN),
            rng.gen_range(config::FOOD_MARGIN..world.height - config::FOOD_MARGIN),
        );
        let radius = rng.gen_range(config::FOOD_RADIUS_MIN..=config::FOOD_RADIUS_MAX) as f32;
        arena.spawn(Entity::food(pos, radius, pick(&config::FOOD_COLORS, rng)));
    }
    n
}

/// Spawn one bot, mass-biased against the current player so difficulty
/// scales with growth. Threat mode guarantees a heavier-than-player bot.
pub fn spawn_bot(
    arena: &mut EntityArena,
    world: &World,
    limits: &Limits,
    rng: &mut impl Rng,
    threat: bool,
) -> Option<EntityId> {
    if arena.bots().len() >= limits.bots {
        return None;
    }

    let player_pos = arena.player_id().and_then(|id| arena.get(id)).map(|p| p.pos);
    let pm = arena
        .player_id()
        .and_then(|id| arena.get(id))
        .map(|p| p.mass)
        .unwrap_or(30.0);

    let mass = if threat {
        (pm * rng.gen_range(1.18..1.55) + rng.gen_range(8.0..22.0))
            .clamp(config::THREAT_MASS_MIN, config::THREAT_MASS_MAX)
    } else {
        let bias = rng.gen::<f32>();
        let mult = if bias < 0.45 {
            rng.gen_range(0.70..0.98)
        } else if bias < 0.80 {
            rng.gen_range(0.95..1.18)
        } else {
            rng.gen_range(1.18..1.40)
        };
        (pm * mult + rng.gen_range(-6.0..16.0)).clamp(config::BOT_MASS_MIN, config::BOT_MASS_MAX)
    };

    let margin = config::BOT_SPAWN_MARGIN;
    let mut pos = vec2(
        rng.gen_range(margin..world.width - margin),
        rng.gen_range(margin..world.height - margin),
    );
    if let Some(pp) = player_pos {
        // Re-roll a few times to avoid dropping a bot on top of the player.
        let safe2 = config::BOT_SPAWN_SAFE_DIST * config::BOT_SPAWN_SAFE_DIST;
        for _ in 0..config::BOT_SPAWN_TRIES {
            if pos.distance_squared(pp) > safe2 {
                break;
            }
            pos = vec2(
                rng.gen_range(margin..world.width - margin),
                rng.gen_range(margin..world.height - margin),
            );
        }
    }

    let name = pick(&config::BOT_NAMES, rng);
    let color = pick(&config::BOT_COLORS, rng);
    let id = arena.spawn(Entity::bot(pos, mass, color, name, rng))?;
    let ang = rng.gen_range(0.0..std::f32::consts::TAU);
    if let Some(bot) = arena.get_mut(id) {
        bot.vel = Vec2::from_angle(ang)
            * rng.gen_range(config::BOT_SPAWN_SPEED_MIN..config::BOT_SPAWN_SPEED_MAX);
    }
    Some(id)
}

pub fn spawn_bots(
    arena: &mut EntityArena,
    world: &World,
    limits: &Limits,
    rng: &mut impl Rng,
    count: usize,
) {
    for _ in 0..count {
        spawn_bot(arena, world, limits, rng, false);
    }
}

pub fn spawn_powerup(
    arena: &mut EntityArena,
    world: &World,
    limits: &Limits,
    rng: &mut impl Rng,
) -> Option<EntityId> {
    if arena.powerups().len() >= limits.powerups {
        return None;
    }
    let margin = config::POWERUP_MARGIN;
    let pos = vec2(
        rng.gen_range(margin..world.width - margin),
        rng.gen_range(margin..world.height - margin),
    );
    let kind = pick(
        &[
            PowerKind::Dash,
            PowerKind::Shield,
            PowerKind::Bomb,
            PowerKind::Magnet,
        ],
        rng,
    );
    arena.spawn(Entity::powerup(pos, kind, pick(&config::POWER_COLORS, rng)))
}

pub fn spawn_powerups(
    arena: &mut EntityArena,
    world: &World,
    limits: &Limits,
    rng: &mut impl Rng,
    count: usize,
) {
    for _ in 0..count {
        spawn_powerup(arena, world, limits, rng);
    }
}

/// Count bots heavier than the player by the threat margin and top up to the
/// minimum with guaranteed-threat spawns. Keeps the game from ever becoming
/// safe no matter how large the player grows.
pub fn ensure_threats(
    arena: &mut EntityArena,
    world: &World,
    limits: &Limits,
    rng: &mut impl Rng,
) {
    let Some(pm) = arena
        .player_id()
        .and_then(|id| arena.get(id))
        .map(|p| p.mass)
    else {
        return;
    };
    let threats = arena
        .bots()
        .iter()
        .filter_map(|&id| arena.get(id))
        .filter(|b| b.alive && b.mass > pm * config::THREAT_RATIO)
        .count();
    for _ in threats..config::THREAT_MIN_COUNT {
        spawn_bot(arena, world, limits, rng, true);
    }
}

/// Advance all spawn streams by the elapsed time and fire the ones whose
/// threshold was crossed.
pub fn auto_spawn(
    arena: &mut EntityArena,
    world: &World,
    limits: &Limits,
    timers: &mut SpawnTimers,
    rng: &mut impl Rng,
    dt: f32,
) {
    let ms = dt * 1000.0;
    timers.food += ms;
    timers.bot += ms;
    timers.power += ms;
    timers.threat += ms;

    if timers.food >= config::FOOD_SPAWN_EVERY_MS {
        timers.food = 0.0;
        spawn_food(arena, world, limits, rng, config::FOOD_SPAWN_BATCH);
    }
    if timers.bot >= config::BOT_SPAWN_EVERY_MS {
        timers.bot = 0.0;
        spawn_bot(arena, world, limits, rng, false);
    }
    if timers.power >= config::POWER_SPAWN_EVERY_MS {
        timers.power = 0.0;
        if arena.powerups().len() < limits.powerups && rng.gen::<f32>() < config::POWER_SPAWN_CHANCE
        {
            spawn_powerup(arena, world, limits, rng);
        }
    }
    if timers.threat >= config::THREAT_CHECK_EVERY_MS {
        timers.threat = 0.0;
        ensure_threats(arena, world, limits, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (EntityArena, World, ChaCha8Rng) {
        let world = World::new(2000.0, 2000.0);
        let mut arena = EntityArena::new(64);
        spawn_player(&mut arena, &world).unwrap();
        (arena, world, ChaCha8Rng::seed_from_u64(11))
    }

    #[test]
    fn food_requests_beyond_the_cap_are_truncated() {
        let (mut arena, world, mut rng) = setup();
        let limits = Limits {
            food: 10,
            ..Default::default()
        };
        let spawned = spawn_food(&mut arena, &world, &limits, &mut rng, 25);
        assert_eq!(spawned, 10);
        assert_eq!(arena.food().len(), 10);

        // Full: further requests yield nothing.
        assert_eq!(spawn_food(&mut arena, &world, &limits, &mut rng, 5), 0);
    }

    #[test]
    fn zero_caps_spawn_nothing() {
        let (mut arena, world, mut rng) = setup();
        let limits = Limits {
            food: 0,
            bots: 0,
            powerups: 0,
        };
        assert_eq!(spawn_food(&mut arena, &world, &limits, &mut rng, 40), 0);
        assert!(spawn_bot(&mut arena, &world, &limits, &mut rng, false).is_none());
        assert!(spawn_powerup(&mut arena, &world, &limits, &mut rng).is_none());
        assert_eq!(arena.count, 1);
    }

    #[test]
    fn threat_floor_tops_up_to_the_minimum() {
        let (mut arena, world, mut rng) = setup();
        let pid = arena.player_id().unwrap();
        arena.get_mut(pid).unwrap().mass = 100.0;
        let limits = Limits::default();

        ensure_threats(&mut arena, &world, &limits, &mut rng);

        assert_eq!(arena.bots().len(), config::THREAT_MIN_COUNT);
        for &id in arena.bots() {
            let bot = arena.get(id).unwrap();
            assert!(bot.mass > 100.0 * config::THREAT_RATIO);
        }

        // Already satisfied: a second pass adds nothing.
        ensure_threats(&mut arena, &world, &limits, &mut rng);
        assert_eq!(arena.bots().len(), config::THREAT_MIN_COUNT);
    }

    #[test]
    fn threat_spawns_always_outweigh_the_player() {
        let (mut arena, world, mut rng) = setup();
        let pid = arena.player_id().unwrap();
        arena.get_mut(pid).unwrap().mass = 60.0;
        let limits = Limits::default();

        for _ in 0..10 {
            let id = spawn_bot(&mut arena, &world, &limits, &mut rng, true).unwrap();
            let bot = arena.get(id).unwrap();
            assert!(bot.mass > 60.0 * config::BOT_FLEE_RATIO);
        }
    }

    #[test]
    fn bot_spawn_respects_the_cap() {
        let (mut arena, world, mut rng) = setup();
        let limits = Limits {
            bots: 4,
            ..Default::default()
        };
        spawn_bots(&mut arena, &world, &limits, &mut rng, 9);
        assert_eq!(arena.bots().len(), 4);
    }

    #[test]
    fn auto_spawn_fires_streams_on_their_thresholds() {
        let (mut arena, world, mut rng) = setup();
        let limits = Limits::default();
        let mut timers = SpawnTimers::new();

        // One 90ms step crosses the food threshold only.
        auto_spawn(&mut arena, &world, &limits, &mut timers, &mut rng, 0.09);
        assert_eq!(arena.food().len(), config::FOOD_SPAWN_BATCH);
        assert!(arena.bots().is_empty());
        assert_eq!(timers.food, 0.0);
        assert!(timers.bot > 0.0);
    }

    #[test]
    fn food_mass_follows_its_radius() {
        let (mut arena, world, mut rng) = setup();
        let limits = Limits::default();
        spawn_food(&mut arena, &world, &limits, &mut rng, 12);
        for &id in arena.food() {
            let f = arena.get(id).unwrap();
            assert!((f.mass - f.radius * config::FOOD_MASS_PER_RADIUS).abs() < 1e-6);
            assert!(f.radius >= config::FOOD_RADIUS_MIN as f32);
            assert!(f.radius <= config::FOOD_RADIUS_MAX as f32);
        }
    }
}
