use macroquad::prelude::*;
use ::rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai;
use crate::camera::Camera;
use crate::collision;
use crate::config;
use crate::effects::FxQueue;
use crate::entity::{Entity, EntityArena, EntityId, EntityKind};
use crate::growth::ScoreBoard;
use crate::player::{self, AbilityState, InputState};
use crate::spatial_hash::SpatialHash;
use crate::spawn::{self, Limits, SpawnTimers};
use crate::stats::SimStats;
use crate::world::{World, WorldPreset};

const ARENA_CAPACITY: usize = 512;
const STATS_CAPACITY: usize = 1000;
const LOG_TAG: &str = "[BLOBARENA]";

const CYCLE_COLORS: [Color; 5] = [
    Color::new(0.27, 0.79, 1.0, 1.0),
    Color::new(0.34, 1.0, 0.54, 1.0),
    Color::new(1.0, 0.83, 0.42, 1.0),
    Color::new(1.0, 0.29, 0.43, 1.0),
    Color::new(0.61, 0.42, 1.0, 1.0),
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Eaten,
    TimeUp,
}

impl Outcome {
    pub fn title(self) -> &'static str {
        match self {
            Outcome::Eaten => "You got eaten",
            Outcome::TimeUp => "Time up",
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct DragState {
    pub id: Option<EntityId>,
    pub offset: Vec2,
}

pub struct LeaderRow {
    pub name: &'static str,
    pub mass: f32,
    pub is_player: bool,
}

/// The whole simulation context, passed explicitly through every per-tick
/// stage. Nothing here is global; a restart rebuilds the lot.
pub struct SimState {
    pub arena: EntityArena,
    pub world: World,
    pub preset: WorldPreset,
    pub spatial: SpatialHash,
    pub abilities: AbilityState,
    pub score: ScoreBoard,
    pub limits: Limits,
    pub timers: SpawnTimers,
    pub fx: FxQueue,
    pub camera: Camera,
    pub stats: SimStats,
    pub rng: ChaCha8Rng,
    pub selected: Option<EntityId>,
    pub drag: DragState,
    pub time_left: f32,
    pub running: bool,
    pub outcome: Option<Outcome>,
    pub auto_spawn: bool,
    pub variable_mouse_speed: bool,
    pub tick_count: u64,
}

impl SimState {
    pub fn new(seed: u64) -> Self {
        let preset = WorldPreset::Medium;
        let world = World::from_preset(preset);
        let spatial = SpatialHash::new(world.width, world.height, config::SPATIAL_CELL_SIZE);
        let mut sim = Self {
            arena: EntityArena::new(ARENA_CAPACITY),
            world,
            preset,
            spatial,
            abilities: AbilityState::new(),
            score: ScoreBoard::new(),
            limits: Limits::default(),
            timers: SpawnTimers::new(),
            fx: FxQueue::new(),
            camera: Camera::new(),
            stats: SimStats::new(STATS_CAPACITY),
            rng: ChaCha8Rng::seed_from_u64(seed),
            selected: None,
            drag: DragState::default(),
            time_left: config::ROUND_TIME,
            running: false,
            outcome: None,
            auto_spawn: true,
            variable_mouse_speed: false,
            tick_count: 0,
        };
        sim.populate();
        sim.running = true;
        sim
    }

    fn populate(&mut self) {
        spawn::spawn_player(&mut self.arena, &self.world);
        spawn::spawn_food(
            &mut self.arena,
            &self.world,
            &self.limits,
            &mut self.rng,
            config::INITIAL_FOOD,
        );
        spawn::spawn_bots(
            &mut self.arena,
            &self.world,
            &self.limits,
            &mut self.rng,
            config::INITIAL_BOTS.min(self.limits.bots),
        );
        spawn::spawn_powerups(
            &mut self.arena,
            &self.world,
            &self.limits,
            &mut self.rng,
            config::INITIAL_POWERUPS.min(self.limits.powerups),
        );
        spawn::ensure_threats(&mut self.arena, &self.world, &self.limits, &mut self.rng);
        self.selected = self.arena.player_id();
    }

    /// Discard the session and rebuild the initial population. Entity
    /// handles from before the restart can never resolve again.
    pub fn restart(&mut self) {
        self.arena = EntityArena::new(ARENA_CAPACITY);
        self.abilities.reset();
        self.score.reset();
        self.timers.reset();
        self.fx.clear();
        self.stats.clear();
        self.camera = Camera::new();
        self.selected = None;
        self.drag = DragState::default();
        self.time_left = config::ROUND_TIME;
        self.outcome = None;
        self.tick_count = 0;
        self.populate();
        self.spatial.rebuild(&self.arena);
        self.running = true;
        eprintln!("{LOG_TAG} restart");
    }

    /// One simulation tick. The elapsed time is capped so a long stall slows
    /// the game down instead of teleporting everything.
    pub fn tick(&mut self, frame_dt: f32, input: &InputState) {
        let dt = frame_dt.min(config::MAX_TICK_DT);

        if self.running {
            player::update_player(
                &mut self.arena,
                &self.world,
                &mut self.abilities,
                input,
                self.variable_mouse_speed,
                &mut self.fx,
                dt,
            );
            self.score.tick(dt);
            ai::update_bots(
                &mut self.arena,
                &self.spatial,
                &self.world,
                &mut self.rng,
                &mut self.fx,
                dt,
            );
            if self.auto_spawn {
                spawn::auto_spawn(
                    &mut self.arena,
                    &self.world,
                    &self.limits,
                    &mut self.timers,
                    &mut self.rng,
                    dt,
                );
            }
        }

        self.spatial.rebuild(&self.arena);

        if self.running {
            collision::apply_magnet(
                &mut self.arena,
                &self.spatial,
                &self.world,
                &self.abilities,
                dt,
            );
            let died = collision::resolve_player(
                &mut self.arena,
                &self.spatial,
                &self.world,
                &mut self.abilities,
                &mut self.score,
                &mut self.fx,
            );
            if died {
                self.game_over(Outcome::Eaten);
            } else {
                self.time_left -= dt;
                if self.time_left <= 0.0 {
                    self.time_left = 0.0;
                    self.game_over(Outcome::TimeUp);
                }
            }
        }

        let removed = self.arena.sweep_dead();
        if let Some(sel) = self.selected {
            if removed.contains(&sel) {
                self.selected = self.arena.player_id();
            }
        }
        if let Some(id) = self.drag.id {
            if self.arena.get(id).is_none() {
                self.drag = DragState::default();
            }
        }

        let focus = self.player().map(|p| (p.pos, p.mass));
        self.camera.update(focus, input.viewport);

        let mass = self.player().map(|p| p.mass).unwrap_or(0.0);
        let threats = self.threat_count();
        self.stats
            .record(mass, self.score.score, self.arena.bots().len(), threats);

        self.tick_count += 1;
    }

    fn game_over(&mut self, outcome: Outcome) {
        if !self.running {
            return;
        }
        self.running = false;
        self.outcome = Some(outcome);
        eprintln!(
            "{LOG_TAG} game over: {} (score {})",
            outcome.title(),
            self.score.score
        );
    }

    pub fn player(&self) -> Option<&Entity> {
        self.arena.player_id().and_then(|id| self.arena.get(id))
    }

    fn player_pos(&self) -> Option<Vec2> {
        self.player().map(|p| p.pos)
    }

    pub fn threat_count(&self) -> usize {
        let Some(pm) = self.player().map(|p| p.mass) else {
            return 0;
        };
        self.arena
            .bots()
            .iter()
            .filter_map(|&id| self.arena.get(id))
            .filter(|b| b.alive && b.mass > pm * config::THREAT_RATIO)
            .count()
    }

    /// Player plus bots, heaviest first.
    pub fn leaderboard(&self, top: usize) -> Vec<LeaderRow> {
        let mut rows = Vec::new();
        if let Some(p) = self.player() {
            rows.push(LeaderRow {
                name: "YOU",
                mass: p.mass,
                is_player: true,
            });
        }
        for &id in self.arena.bots() {
            if let Some(b) = self.arena.get(id) {
                if b.alive {
                    rows.push(LeaderRow {
                        name: b.name.unwrap_or("BOT"),
                        mass: b.mass,
                        is_player: false,
                    });
                }
            }
        }
        rows.sort_by(|a, b| b.mass.partial_cmp(&a.mass).unwrap_or(std::cmp::Ordering::Equal));
        rows.truncate(top);
        rows
    }

    // ---- commands from the presentation layer ----

    pub fn activate_shield(&mut self) {
        player::activate_shield(&self.arena, &mut self.abilities, &mut self.fx);
    }

    pub fn activate_bomb(&mut self) {
        player::activate_bomb(
            &mut self.arena,
            &self.spatial,
            &mut self.abilities,
            &mut self.score,
            &mut self.fx,
        );
    }

    /// First click selects; a click on the already-selected entity acts on
    /// it (shield or color for the player, activation for powerups).
    pub fn click_entity(&mut self, id: EntityId) {
        if self.selected != Some(id) {
            self.selected = Some(id);
            return;
        }
        let Some((kind, power, pos, color)) = self
            .arena
            .get(id)
            .map(|e| (e.kind, e.power, e.pos, e.color))
        else {
            return;
        };
        match kind {
            EntityKind::Player => {
                if self.abilities.shield_ready() {
                    self.activate_shield();
                } else {
                    self.cycle_color(id);
                }
            }
            EntityKind::Powerup => {
                if let Some(pk) = power {
                    player::apply_powerup(
                        pk,
                        pos,
                        color,
                        &mut self.abilities,
                        &mut self.score,
                        &mut self.fx,
                    );
                }
                if let Some(e) = self.arena.get_mut(id) {
                    e.alive = false;
                }
                self.fx.burst(pos, color);
            }
            _ => {
                self.fx.float_text("SCAN", pos, config::FX_GOLD);
            }
        }
    }

    /// Clicking empty arena space falls back to selecting the player.
    pub fn click_world(&mut self) {
        self.selected = self.arena.player_id();
    }

    /// Cosmetic color cycling. The player walks its palette; everything else
    /// gets a random pick.
    pub fn cycle_color(&mut self, id: EntityId) {
        let Some((kind, current)) = self.arena.get(id).map(|e| (e.kind, e.color)) else {
            return;
        };
        let (new_color, ping) = match kind {
            EntityKind::Player => {
                let idx = config::PLAYER_COLORS
                    .iter()
                    .position(|&c| c == current)
                    .unwrap_or(config::PLAYER_COLORS.len() - 1);
                (
                    config::PLAYER_COLORS[(idx + 1) % config::PLAYER_COLORS.len()],
                    true,
                )
            }
            _ => (spawn::pick(&CYCLE_COLORS, &mut self.rng), false),
        };
        let pos = self.arena.get(id).map(|e| e.pos);
        if let Some(e) = self.arena.get_mut(id) {
            e.color = new_color;
        }
        if ping {
            if let Some(pos) = pos {
                self.fx.float_text("COLOR", pos, config::FX_INFO);
            }
        }
    }

    /// The player entity is explicitly protected from deletion.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected else { return };
        let Some((kind, pos, color)) = self.arena.get(id).map(|e| (e.kind, e.pos, e.color)) else {
            return;
        };
        if kind == EntityKind::Player {
            return;
        }
        if let Some(e) = self.arena.get_mut(id) {
            e.alive = false;
        }
        self.fx.burst(pos, color);
    }

    pub fn begin_drag(&mut self, id: EntityId, world_pos: Vec2) {
        let Some(e) = self.arena.get(id) else { return };
        if !e.alive || e.kind != EntityKind::Powerup {
            return;
        }
        self.drag = DragState {
            id: Some(id),
            offset: e.pos - world_pos,
        };
    }

    /// Move the dragged powerup; dropping it onto the player applies it on
    /// the spot.
    pub fn drag_to(&mut self, world_pos: Vec2) {
        let Some(id) = self.drag.id else { return };
        let offset = self.drag.offset;

        let moved = match self.arena.get_mut(id) {
            Some(e) if e.alive && e.kind == EntityKind::Powerup => {
                e.pos = self.world.clamp_circle(world_pos + offset, e.radius);
                Some((e.pos, e.radius))
            }
            _ => None,
        };
        let Some((pos, radius)) = moved else {
            self.drag = DragState::default();
            return;
        };

        let touches_player = self
            .player()
            .map(|p| {
                let r = p.radius + radius;
                p.pos.distance_squared(pos) <= r * r
            })
            .unwrap_or(false);
        if touches_player {
            let Some((power, color)) = self.arena.get(id).map(|e| (e.power, e.color)) else {
                return;
            };
            if let Some(pk) = power {
                player::apply_powerup(
                    pk,
                    pos,
                    color,
                    &mut self.abilities,
                    &mut self.score,
                    &mut self.fx,
                );
            }
            if let Some(e) = self.arena.get_mut(id) {
                e.alive = false;
            }
            self.fx.burst(pos, color);
            self.drag = DragState::default();
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::default();
    }

    /// Nearest alive entity under the pointer, if any.
    pub fn pick_entity(&self, world_pos: Vec2) -> Option<EntityId> {
        let mut best: Option<(f32, EntityId)> = None;
        for (idx, e) in self.arena.iter_alive() {
            let r = e.radius.max(12.0);
            let d2 = e.pos.distance_squared(world_pos);
            if d2 <= r * r && best.map_or(true, |(bd, _)| d2 < bd) {
                if let Some(id) = self.arena.id_of_index(idx) {
                    best = Some((d2, id));
                }
            }
        }
        best.map(|(_, id)| id)
    }

    pub fn set_world_preset(&mut self, preset: WorldPreset, viewport: Vec2) {
        self.preset = preset;
        self.world = World::from_preset(preset);
        self.spatial
            .resize_world(self.world.width, self.world.height);
        for slot in self.arena.entities.iter_mut() {
            if let Some(e) = slot {
                e.pos = self.world.clamp_circle(e.pos, e.radius);
            }
        }
        if let Some(pos) = self.player_pos() {
            self.camera.snap_to(pos, viewport);
            self.fx.float_text(
                format!("WORLD: {}", preset.label().to_uppercase()),
                pos,
                config::FX_GOLD,
            );
        }
        eprintln!("{LOG_TAG} world preset: {}", preset.label());
    }

    pub fn set_limits(&mut self, food: usize, bots: usize, powerups: usize) {
        self.limits = Limits {
            food,
            bots,
            powerups,
        };
        if let Some(pos) = self.player_pos() {
            self.fx.float_text("LIMITS APPLIED", pos, config::FX_INFO);
        }
    }

    pub fn add_food(&mut self, count: usize) {
        spawn::spawn_food(
            &mut self.arena,
            &self.world,
            &self.limits,
            &mut self.rng,
            count,
        );
        if let Some(pos) = self.player_pos() {
            self.fx
                .float_text(format!("Food +{count}"), pos, config::FX_SCORE);
        }
    }

    pub fn add_bots(&mut self, count: usize) {
        spawn::spawn_bots(
            &mut self.arena,
            &self.world,
            &self.limits,
            &mut self.rng,
            count,
        );
        if let Some(pos) = self.player_pos() {
            self.fx
                .float_text(format!("Bots +{count}"), pos, config::FX_DANGER);
        }
    }

    pub fn add_powerups(&mut self, count: usize) {
        spawn::spawn_powerups(
            &mut self.arena,
            &self.world,
            &self.limits,
            &mut self.rng,
            count,
        );
        if let Some(pos) = self.player_pos() {
            self.fx
                .float_text(format!("Power +{count}"), pos, config::FX_GOLD);
        }
    }
}

pub fn format_time(seconds: f32) -> String {
    let s = seconds.max(0.0) as u32;
    format!("{}:{:02}", s / 60, s % 60)
}
