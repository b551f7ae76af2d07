use macroquad::prelude::*;
use ::rand::Rng;

use crate::config;
use crate::effects::FxQueue;
use crate::entity::{EntityArena, EntityId, EntityKind};
use crate::growth;
use crate::spatial_hash::SpatialHash;
use crate::world::World;

pub fn bot_speed(mass: f32) -> f32 {
    (config::BOT_SPEED_BASE - mass.sqrt() * config::BOT_SPEED_SLOPE)
        .clamp(config::BOT_SPEED_MIN, config::BOT_SPEED_MAX)
}

/// Repulsion away from world edges, ramping up inside the padding band.
fn wall_avoidance(world: &World, pos: Vec2) -> Vec2 {
    let pad = config::WALL_PAD;
    let mut push = Vec2::ZERO;
    if pos.x < pad {
        push.x += (pad - pos.x) / pad;
    }
    if pos.x > world.width - pad {
        push.x -= (pos.x - (world.width - pad)) / pad;
    }
    if pos.y < pad {
        push.y += (pad - pos.y) / pad;
    }
    if pos.y > world.height - pad {
        push.y -= (pos.y - (world.height - pad)) / pad;
    }
    push
}

/// Nearest food among a bounded random sample. Trades optimality for not
/// scanning hundreds of pellets per bot per retarget.
fn nearest_food(arena: &EntityArena, rng: &mut impl Rng, from: Vec2) -> Option<EntityId> {
    let foods = arena.food();
    if foods.is_empty() {
        return None;
    }
    let samples = foods.len().min(config::FOOD_SAMPLES);
    let mut best: Option<(f32, EntityId)> = None;
    for _ in 0..samples {
        let id = foods[rng.gen_range(0..foods.len())];
        let Some(f) = arena.get(id) else { continue };
        if !f.alive {
            continue;
        }
        let d = from.distance_squared(f.pos);
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, id));
        }
    }
    best.map(|(_, id)| id)
}

fn hunt_chance(personality: f32) -> f32 {
    config::BOT_HUNT_CHANCE_MIN
        + (config::BOT_HUNT_CHANCE_MAX - config::BOT_HUNT_CHANCE_MIN) * personality
}

/// Steer, move and feed every bot. Bots query the grid built on the previous
/// tick's positions; the one-tick staleness is within the cell-size slack.
pub fn update_bots(
    arena: &mut EntityArena,
    spatial: &SpatialHash,
    world: &World,
    rng: &mut impl Rng,
    fx: &mut FxQueue,
    dt: f32,
) {
    let Some(pid) = arena.player_id() else {
        return;
    };
    let (ppos, pmass) = match arena.get(pid) {
        Some(p) => (p.pos, p.mass),
        None => return,
    };

    let bot_ids: Vec<EntityId> = arena.bots().to_vec();
    for id in bot_ids {
        // Passive growth keeps the population from stagnating even with no
        // food around.
        let (bpos, mut bvel, bmass, bradius, mind) = {
            let Some(bot) = arena.get_mut(id) else { continue };
            if !bot.alive {
                continue;
            }
            bot.mass += config::BOT_PASSIVE_GROWTH_PER_SEC * dt;
            bot.radius = growth::radius_from_mass(bot.mass);
            (bot.pos, bot.vel, bot.mass, bot.radius, bot.mind.clone())
        };
        let Some(mut mind) = mind else { continue };

        let bigger = bmass > pmass * config::BOT_BIGGER_RATIO;
        let smaller = bmass < pmass * config::BOT_SMALLER_RATIO;

        mind.retarget_timer -= dt;
        if mind.retarget_timer <= 0.0 {
            mind.retarget_timer = rng.gen_range(config::BOT_RETARGET_MIN..config::BOT_RETARGET_MAX);
            mind.target = if smaller {
                nearest_food(arena, rng, bpos)
            } else if bigger && rng.gen::<f32>() < hunt_chance(mind.personality) {
                Some(pid)
            } else {
                nearest_food(arena, rng, bpos)
            };
        }

        let target_pos = mind
            .target
            .and_then(|tid| arena.get(tid))
            .filter(|e| e.alive)
            .map(|e| e.pos);
        let tpos = match target_pos {
            Some(p) => p,
            None => {
                // No target: drift, occasionally picking a fresh heading.
                if rng.gen::<f32>() < config::WANDER_CHANCE {
                    let ang = rng.gen_range(0.0..std::f32::consts::TAU);
                    bvel = Vec2::from_angle(ang)
                        * rng.gen_range(config::WANDER_SPEED_MIN..config::WANDER_SPEED_MAX);
                }
                bpos + bvel
            }
        };

        let mut steer = tpos - bpos;

        // A much larger player overrides everything: run, but keep a pull
        // toward food so fleeing bots still feed.
        if pmass > bmass * config::BOT_FLEE_RATIO {
            steer = bpos - ppos;
            if let Some(fpos) = nearest_food(arena, rng, bpos)
                .and_then(|fid| arena.get(fid))
                .map(|f| f.pos)
            {
                let blend = config::BOT_FLEE_FOOD_BLEND;
                steer = steer * (1.0 - blend) + (fpos - bpos) * blend;
            }
        }

        let mut steer = steer.normalize_or_zero();
        steer += wall_avoidance(world, bpos) * config::WALL_WEIGHT;
        let steer = steer.normalize_or_zero();

        let mut speed = bot_speed(bmass);
        if bigger && mind.target == Some(pid) {
            speed *= config::BOT_AGGRO_SPEED_MIN
                + (config::BOT_AGGRO_SPEED_MAX - config::BOT_AGGRO_SPEED_MIN) * mind.personality;
        }

        let desired = steer * speed;
        bvel += (desired - bvel) * config::BOT_VEL_LERP;
        let new_pos = world.clamp_circle(bpos + bvel * dt, bradius);

        if let Some(bot) = arena.get_mut(id) {
            bot.vel = bvel;
            bot.pos = new_pos;
            bot.mind = Some(mind);
        }

        eat_food(arena, spatial, fx, id);
        if config::BOT_EAT_BOT_ENABLED {
            eat_bots(arena, spatial, fx, id);
        }
    }
}

/// Consume the first overlapping pellet, if any.
fn eat_food(arena: &mut EntityArena, spatial: &SpatialHash, fx: &mut FxQueue, id: EntityId) {
    let Some(bot) = arena.get(id) else { return };
    let (bpos, bradius) = (bot.pos, bot.radius);

    let mut hit = None;
    for idx in spatial.neighbors(bpos) {
        let Some(f) = arena.get_by_index(idx as usize) else {
            continue;
        };
        if !f.alive || f.kind != EntityKind::Food {
            continue;
        }
        let r = bradius + f.radius;
        if bpos.distance_squared(f.pos) <= r * r {
            hit = Some(idx as usize);
            break;
        }
    }

    let Some(idx) = hit else { return };
    let Some(food) = arena.get_mut_by_index(idx) else {
        return;
    };
    let (fmass, fpos, fcolor) = (food.mass, food.pos, food.color);
    food.alive = false;
    fx.burst(fpos, fcolor);
    if let Some(bot) = arena.get_mut(id) {
        growth::grow(bot, fmass, config::BOT_FOOD_GAIN);
    }
}

/// Predation between bots: only with a clear mass advantage, and only a
/// fraction of the victim's mass transfers.
fn eat_bots(arena: &mut EntityArena, spatial: &SpatialHash, fx: &mut FxQueue, id: EntityId) {
    let Some(bot) = arena.get(id) else { return };
    let (bpos, bradius, bmass) = (bot.pos, bot.radius, bot.mass);

    let mut hit = None;
    for idx in spatial.neighbors(bpos) {
        if idx == id.index {
            continue;
        }
        let Some(other) = arena.get_by_index(idx as usize) else {
            continue;
        };
        if !other.alive || other.kind != EntityKind::Bot {
            continue;
        }
        if bmass <= other.mass * config::BOT_EAT_BOT_RATIO {
            continue;
        }
        let r = bradius + other.radius;
        if bpos.distance_squared(other.pos) <= r * r {
            hit = Some(idx as usize);
            break;
        }
    }

    let Some(idx) = hit else { return };
    let Some(victim) = arena.get_mut_by_index(idx) else {
        return;
    };
    let (vmass, vpos, vcolor) = (victim.mass, victim.pos, victim.color);
    victim.alive = false;
    fx.burst(vpos, vcolor);
    if let Some(bot) = arena.get_mut(id) {
        growth::grow(bot, vmass * config::BOT_EAT_BOT_TRANSFER, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(world_w: f32, world_h: f32) -> (EntityArena, SpatialHash, World, ChaCha8Rng) {
        let world = World::new(world_w, world_h);
        let arena = EntityArena::new(32);
        let spatial = SpatialHash::new(world_w, world_h, config::SPATIAL_CELL_SIZE);
        (arena, spatial, world, ChaCha8Rng::seed_from_u64(77))
    }

    #[test]
    fn bots_flee_a_much_larger_player() {
        let (mut arena, spatial, world, mut rng) = setup(2000.0, 2000.0);
        let pid = arena.spawn(Entity::player(vec2(900.0, 1000.0))).unwrap();
        arena.get_mut(pid).unwrap().mass = 200.0;
        let bot = arena
            .spawn(Entity::bot(vec2(1000.0, 1000.0), 20.0, WHITE, "Runt", &mut rng))
            .unwrap();

        let mut fx = FxQueue::new();
        update_bots(&mut arena, &spatial, &world, &mut rng, &mut fx, 0.033);

        // Player is to the left, so the bot must be accelerating right.
        assert!(arena.get(bot).unwrap().vel.x > 0.0);
    }

    #[test]
    fn passive_growth_keeps_radius_consistent() {
        let (mut arena, spatial, world, mut rng) = setup(2000.0, 2000.0);
        arena.spawn(Entity::player(vec2(100.0, 100.0))).unwrap();
        let bot = arena
            .spawn(Entity::bot(vec2(1500.0, 1500.0), 30.0, WHITE, "Grower", &mut rng))
            .unwrap();

        let mut fx = FxQueue::new();
        update_bots(&mut arena, &spatial, &world, &mut rng, &mut fx, 1.0);

        let b = arena.get(bot).unwrap();
        assert!(b.mass > 30.0);
        assert!((b.radius - growth::radius_from_mass(b.mass)).abs() < 1e-5);
    }

    #[test]
    fn heavier_bot_consumes_overlapping_lighter_bot() {
        let (mut arena, mut spatial, _world, mut rng) = setup(2000.0, 2000.0);
        arena.spawn(Entity::player(vec2(100.0, 100.0))).unwrap();
        let predator = arena
            .spawn(Entity::bot(vec2(1000.0, 1000.0), 58.0, WHITE, "Big", &mut rng))
            .unwrap();
        let prey = arena
            .spawn(Entity::bot(vec2(1010.0, 1000.0), 50.0, WHITE, "Small", &mut rng))
            .unwrap();
        // 58 <= 50 * 1.18, so no predation yet.
        spatial.rebuild(&arena);
        let mut fx = FxQueue::new();
        eat_bots(&mut arena, &spatial, &mut fx, predator);
        assert!(arena.get(prey).unwrap().alive);

        // Past the margin the transfer goes through the predator's own
        // diminishing factor.
        arena.get_mut(predator).unwrap().mass = 60.0;
        spatial.rebuild(&arena);
        let expected = 60.0 + 50.0 * config::BOT_EAT_BOT_TRANSFER * growth::diminish_gain(60.0);
        eat_bots(&mut arena, &spatial, &mut fx, predator);

        assert!(!arena.get(prey).unwrap().alive);
        assert!((arena.get(predator).unwrap().mass - expected).abs() < 1e-4);
    }

    #[test]
    fn bots_eat_overlapping_food_through_the_grid() {
        let (mut arena, mut spatial, _world, mut rng) = setup(2000.0, 2000.0);
        arena.spawn(Entity::player(vec2(100.0, 100.0))).unwrap();
        let bot = arena
            .spawn(Entity::bot(vec2(1000.0, 1000.0), 30.0, WHITE, "Eater", &mut rng))
            .unwrap();
        let pellet = arena
            .spawn(Entity::food(vec2(1012.0, 1000.0), 7.0, WHITE))
            .unwrap();
        spatial.rebuild(&arena);

        let mut fx = FxQueue::new();
        let before = arena.get(bot).unwrap().mass;
        eat_food(&mut arena, &spatial, &mut fx, bot);

        assert!(!arena.get(pellet).unwrap().alive);
        let expected =
            before + 7.0 * config::FOOD_MASS_PER_RADIUS * config::BOT_FOOD_GAIN * growth::diminish_gain(before);
        assert!((arena.get(bot).unwrap().mass - expected).abs() < 1e-4);
        assert!(!fx.is_empty());
    }

    #[test]
    fn wall_avoidance_pushes_back_inside_the_pad() {
        let world = World::new(2000.0, 2000.0);
        let push = wall_avoidance(&world, vec2(40.0, 1960.0));
        assert!(push.x > 0.0);
        assert!(push.y < 0.0);
        assert_eq!(wall_avoidance(&world, vec2(1000.0, 1000.0)), Vec2::ZERO);
    }
}
