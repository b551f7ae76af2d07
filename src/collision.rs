use macroquad::prelude::*;

use crate::config;
use crate::effects::FxQueue;
use crate::entity::{EntityArena, EntityKind};
use crate::growth::{self, ScoreBoard};
use crate::player::{self, AbilityState};
use crate::spatial_hash::SpatialHash;
use crate::world::World;

/// While the magnet is active, drag nearby pellets toward the player. Pull
/// strength falls off linearly to zero at the pull radius; pellets outside
/// it never move.
pub fn apply_magnet(
    arena: &mut EntityArena,
    spatial: &SpatialHash,
    world: &World,
    abilities: &AbilityState,
    dt: f32,
) {
    if !abilities.magnet_active() {
        return;
    }
    let Some(ppos) = arena.player_id().and_then(|id| arena.get(id)).map(|p| p.pos) else {
        return;
    };

    let pull_r = config::MAGNET_RADIUS;
    let pull_r2 = pull_r * pull_r;
    let targets: Vec<u32> = spatial.neighbors(ppos).collect();
    for idx in targets {
        let Some(f) = arena.get_mut_by_index(idx as usize) else {
            continue;
        };
        if !f.alive || f.kind != EntityKind::Food {
            continue;
        }
        let to_player = ppos - f.pos;
        let d2 = to_player.length_squared();
        if d2 >= pull_r2 {
            continue;
        }
        let d = d2.sqrt().max(1.0);
        let t = (1.0 - d / pull_r).clamp(0.0, 1.0);
        f.pos += (to_player / d) * config::MAGNET_PULL * t * dt * config::MAGNET_PULL_SCALE;
        f.pos = world.clamp_circle(f.pos, f.radius);
    }
}

/// Resolve every player-vs-entity overlap for this tick. Returns true when
/// the player was eaten; the caller flips the running flag.
pub fn resolve_player(
    arena: &mut EntityArena,
    spatial: &SpatialHash,
    world: &World,
    abilities: &mut AbilityState,
    score: &mut ScoreBoard,
    fx: &mut FxQueue,
) -> bool {
    let Some(pid) = arena.player_id() else {
        return false;
    };
    let pidx = pid.index as usize;
    let shielded = abilities.shield_active();
    let query_pos = match arena.get(pid) {
        Some(p) => p.pos,
        None => return false,
    };

    let candidates: Vec<u32> = spatial.neighbors(query_pos).collect();
    for idx in candidates {
        let idx = idx as usize;
        if idx == pidx {
            continue;
        }
        // Re-read the player every iteration: eating mid-loop changes its
        // mass and radius for the comparisons that follow.
        let (ppos, pradius, pmass) = match arena.get_by_index(pidx) {
            Some(p) => (p.pos, p.radius, p.mass),
            None => return false,
        };
        let Some(e) = arena.get_by_index(idx) else {
            continue;
        };
        if !e.alive {
            continue;
        }
        let rsum = pradius + e.radius;
        if ppos.distance_squared(e.pos) > rsum * rsum {
            continue;
        }

        match e.kind {
            EntityKind::Food => {
                let (fmass, fpos, fcolor) = (e.mass, e.pos, e.color);
                score.award(config::SCORE_FOOD, fpos, config::FX_SCORE, fx);
                if let Some(f) = arena.get_mut_by_index(idx) {
                    f.alive = false;
                }
                fx.burst(fpos, fcolor);
                if let Some(p) = arena.get_mut_by_index(pidx) {
                    growth::grow(p, fmass, config::PLAYER_FOOD_GAIN);
                }
            }
            EntityKind::Powerup => {
                let (power, pos, color) = (e.power, e.pos, e.color);
                if let Some(kind) = power {
                    player::apply_powerup(kind, pos, color, abilities, score, fx);
                }
                if let Some(pw) = arena.get_mut_by_index(idx) {
                    pw.alive = false;
                }
                fx.burst(pos, color);
            }
            EntityKind::Bot => {
                if shielded {
                    // Bounce the bot off along the contact normal.
                    let Some(bot) = arena.get_mut_by_index(idx) else {
                        continue;
                    };
                    let normal = (bot.pos - ppos).normalize_or_zero();
                    bot.pos += normal * config::SHIELD_KNOCKBACK;
                    bot.pos = world.clamp_circle(bot.pos, bot.radius);
                    continue;
                }
                if pmass > e.mass * config::PLAYER_EAT_RATIO {
                    let (bmass, bpos, bcolor) = (e.mass, e.pos, e.color);
                    score.award(config::SCORE_EAT_BOT, bpos, config::FX_GOLD, fx);
                    if let Some(bot) = arena.get_mut_by_index(idx) {
                        bot.alive = false;
                    }
                    fx.burst(bpos, bcolor);
                    if let Some(p) = arena.get_mut_by_index(pidx) {
                        growth::grow(p, bmass * config::PLAYER_EAT_TRANSFER, 1.0);
                    }
                } else if e.mass > pmass * config::PLAYER_DIE_RATIO {
                    if let Some(p) = arena.get_mut_by_index(pidx) {
                        p.alive = false;
                    }
                    fx.burst(ppos, config::FX_DANGER);
                    return true;
                } else {
                    fx.float_text("CLASH", ppos, config::FX_DANGER);
                }
            }
            EntityKind::Player => {}
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(player_mass: f32) -> (EntityArena, SpatialHash, World, AbilityState, ScoreBoard, FxQueue) {
        let world = World::new(1000.0, 1000.0);
        let mut arena = EntityArena::new(16);
        let pid = arena.spawn(Entity::player(world.center())).unwrap();
        arena.get_mut(pid).unwrap().mass = player_mass;
        let spatial = SpatialHash::new(world.width, world.height, config::SPATIAL_CELL_SIZE);
        (
            arena,
            spatial,
            world,
            AbilityState::new(),
            ScoreBoard::new(),
            FxQueue::new(),
        )
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(5)
    }

    #[test]
    fn eating_food_awards_score_and_diminished_mass() {
        let (mut arena, mut spatial, world, mut abilities, mut score, mut fx) = setup(24.0);
        let food = arena
            .spawn(Entity::food(world.center() + vec2(5.0, 0.0), 7.0, WHITE))
            .unwrap();
        arena.get_mut(food).unwrap().mass = 7.0;
        spatial.rebuild(&arena);

        let died = resolve_player(&mut arena, &spatial, &world, &mut abilities, &mut score, &mut fx);

        assert!(!died);
        assert_eq!(score.score, config::SCORE_FOOD);
        assert!(!arena.get(food).unwrap().alive);
        let expected = 24.0 + 7.0 * config::PLAYER_FOOD_GAIN * growth::diminish_gain(24.0);
        let p = arena.get(arena.player_id().unwrap()).unwrap();
        assert!((p.mass - expected).abs() < 1e-4);
        assert!((p.radius - growth::radius_from_mass(p.mass)).abs() < 1e-5);
    }

    #[test]
    fn heavier_bot_kills_the_player() {
        let (mut arena, mut spatial, world, mut abilities, mut score, mut fx) = setup(40.0);
        let bot = arena
            .spawn(Entity::bot(world.center() + vec2(10.0, 0.0), 46.0, WHITE, "Hunter", &mut rng()))
            .unwrap();
        spatial.rebuild(&arena);

        let died = resolve_player(&mut arena, &spatial, &world, &mut abilities, &mut score, &mut fx);

        assert!(died);
        let pid = arena.player_id().unwrap();
        assert!(!arena.get(pid).unwrap().alive);
        assert!(arena.get(bot).unwrap().alive);
        assert_eq!(score.score, 0);
    }

    #[test]
    fn player_eats_sufficiently_smaller_bot() {
        let (mut arena, mut spatial, world, mut abilities, mut score, mut fx) = setup(60.0);
        let bot = arena
            .spawn(Entity::bot(world.center() + vec2(10.0, 0.0), 40.0, WHITE, "Snack", &mut rng()))
            .unwrap();
        spatial.rebuild(&arena);

        let died = resolve_player(&mut arena, &spatial, &world, &mut abilities, &mut score, &mut fx);

        assert!(!died);
        assert!(!arena.get(bot).unwrap().alive);
        assert_eq!(score.score, config::SCORE_EAT_BOT);
        let expected =
            60.0 + 40.0 * config::PLAYER_EAT_TRANSFER * growth::diminish_gain(60.0);
        let p = arena.get(arena.player_id().unwrap()).unwrap();
        assert!((p.mass - expected).abs() < 1e-4);
    }

    #[test]
    fn near_equal_masses_only_clash() {
        let (mut arena, mut spatial, world, mut abilities, mut score, mut fx) = setup(40.0);
        let bot = arena
            .spawn(Entity::bot(world.center() + vec2(10.0, 0.0), 42.0, WHITE, "Rival", &mut rng()))
            .unwrap();
        spatial.rebuild(&arena);

        let died = resolve_player(&mut arena, &spatial, &world, &mut abilities, &mut score, &mut fx);

        assert!(!died);
        assert!(arena.get(bot).unwrap().alive);
        assert!(arena.get(arena.player_id().unwrap()).unwrap().alive);
        assert_eq!(score.score, 0);
        assert!(!fx.is_empty());
    }

    #[test]
    fn shield_repels_instead_of_resolving_mass() {
        let (mut arena, mut spatial, world, mut abilities, mut score, mut fx) = setup(40.0);
        let bot = arena
            .spawn(Entity::bot(world.center() + vec2(10.0, 0.0), 300.0, WHITE, "Wall", &mut rng()))
            .unwrap();
        spatial.rebuild(&arena);
        abilities.shield_time = 1.0;

        let before = arena.get(bot).unwrap().pos;
        let died = resolve_player(&mut arena, &spatial, &world, &mut abilities, &mut score, &mut fx);

        assert!(!died);
        let after = arena.get(bot).unwrap();
        assert!(after.alive);
        assert!(after.pos.x > before.x);
        assert_eq!(after.mass, 300.0);
        assert_eq!(score.score, 0);
    }

    #[test]
    fn powerup_contact_applies_its_effect() {
        let (mut arena, mut spatial, world, mut abilities, mut score, mut fx) = setup(24.0);
        let power = arena
            .spawn(Entity::powerup(
                world.center() + vec2(5.0, 0.0),
                crate::entity::PowerKind::Bomb,
                WHITE,
            ))
            .unwrap();
        spatial.rebuild(&arena);

        resolve_player(&mut arena, &spatial, &world, &mut abilities, &mut score, &mut fx);

        assert!(!arena.get(power).unwrap().alive);
        assert_eq!(abilities.bomb_charges, 1);
        assert_eq!(score.score, config::SCORE_POWERUP);
    }

    #[test]
    fn magnet_pulls_near_food_and_ignores_far_food() {
        let (mut arena, mut spatial, world, mut abilities, _score, _fx) = setup(24.0);
        let center = world.center();
        let near = arena
            .spawn(Entity::food(center + vec2(100.0, 0.0), 6.0, WHITE))
            .unwrap();
        let far = arena
            .spawn(Entity::food(center + vec2(300.0, 0.0), 6.0, WHITE))
            .unwrap();
        spatial.rebuild(&arena);
        abilities.magnet_time = 1.0;

        apply_magnet(&mut arena, &spatial, &world, &abilities, 0.033);

        let near_dist = arena.get(near).unwrap().pos.distance(center);
        assert!(near_dist < 100.0);
        assert_eq!(arena.get(far).unwrap().pos, center + vec2(300.0, 0.0));
    }

    #[test]
    fn magnet_off_moves_nothing() {
        let (mut arena, mut spatial, world, abilities, _score, _fx) = setup(24.0);
        let center = world.center();
        let near = arena
            .spawn(Entity::food(center + vec2(100.0, 0.0), 6.0, WHITE))
            .unwrap();
        spatial.rebuild(&arena);

        apply_magnet(&mut arena, &spatial, &world, &abilities, 0.033);
        assert_eq!(arena.get(near).unwrap().pos, center + vec2(100.0, 0.0));
    }
}
