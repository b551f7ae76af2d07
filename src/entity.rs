use macroquad::prelude::*;
use ::rand::Rng;

use crate::config;
use crate::growth;

/// Stable handle to an entity. The generation field invalidates stale
/// references: a despawned slot bumps its generation, so a handle to a
/// removed entity can never resolve again.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EntityKind {
    Player,
    Bot,
    Food,
    Powerup,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Player => "PLAYER",
            EntityKind::Bot => "BOT",
            EntityKind::Food => "FOOD",
            EntityKind::Powerup => "POWERUP",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PowerKind {
    Dash,
    Shield,
    Bomb,
    Magnet,
}

impl PowerKind {
    pub fn label(self) -> &'static str {
        match self {
            PowerKind::Dash => "DASH",
            PowerKind::Shield => "SHIELD",
            PowerKind::Bomb => "BOMB",
            PowerKind::Magnet => "MAGNET",
        }
    }

    /// One-letter tag drawn on the powerup disc.
    pub fn glyph(self) -> &'static str {
        match self {
            PowerKind::Dash => "D",
            PowerKind::Shield => "S",
            PowerKind::Bomb => "B",
            PowerKind::Magnet => "M",
        }
    }
}

/// Per-bot steering state.
#[derive(Clone, Debug)]
pub struct BotMind {
    pub target: Option<EntityId>,
    pub retarget_timer: f32,
    /// Fixed aggression bias in [0,1), drawn once at spawn.
    pub personality: f32,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub color: Color,
    pub name: Option<&'static str>,
    pub power: Option<PowerKind>,
    pub mind: Option<BotMind>,
    pub alive: bool,
}

impl Entity {
    pub fn player(pos: Vec2) -> Self {
        let mass = config::PLAYER_START_MASS;
        Self {
            kind: EntityKind::Player,
            pos,
            vel: Vec2::ZERO,
            mass,
            radius: growth::radius_from_mass(mass),
            color: config::PLAYER_COLORS[0],
            name: None,
            power: None,
            mind: None,
            alive: true,
        }
    }

    /// Food owns its radius directly; mass is derived from it, not the other
    /// way around.
    pub fn food(pos: Vec2, radius: f32, color: Color) -> Self {
        Self {
            kind: EntityKind::Food,
            pos,
            vel: Vec2::ZERO,
            mass: radius * config::FOOD_MASS_PER_RADIUS,
            radius,
            color,
            name: None,
            power: None,
            mind: None,
            alive: true,
        }
    }

    pub fn bot(
        pos: Vec2,
        mass: f32,
        color: Color,
        name: &'static str,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            kind: EntityKind::Bot,
            pos,
            vel: Vec2::ZERO,
            mass,
            radius: growth::radius_from_mass(mass),
            color,
            name: Some(name),
            power: None,
            mind: Some(BotMind {
                target: None,
                retarget_timer: rng
                    .gen_range(config::BOT_FIRST_RETARGET_MIN..config::BOT_FIRST_RETARGET_MAX),
                personality: rng.gen::<f32>(),
            }),
            alive: true,
        }
    }

    pub fn powerup(pos: Vec2, power: PowerKind, color: Color) -> Self {
        Self {
            kind: EntityKind::Powerup,
            pos,
            vel: Vec2::ZERO,
            mass: config::POWERUP_MASS,
            radius: config::POWERUP_RADIUS,
            color,
            name: None,
            power: Some(power),
            mind: None,
            alive: true,
        }
    }
}

/// Arena-based entity storage with generational indices and a free list,
/// plus per-kind id lists for O(1) population queries.
pub struct EntityArena {
    pub entities: Vec<Option<Entity>>,
    pub generations: Vec<u32>,
    free_list: Vec<u32>,
    pub count: usize,
    player: Option<EntityId>,
    bots: Vec<EntityId>,
    food: Vec<EntityId>,
    powerups: Vec<EntityId>,
}

impl EntityArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            entities: vec![None; capacity],
            generations: vec![0; capacity],
            free_list: (0..capacity as u32).rev().collect(),
            count: 0,
            player: None,
            bots: Vec::new(),
            food: Vec::new(),
            powerups: Vec::new(),
        }
    }

    /// Insert an entity, growing the arena if the free list is exhausted.
    /// Returns `None` only when a second player would be created.
    pub fn spawn(&mut self, entity: Entity) -> Option<EntityId> {
        if entity.kind == EntityKind::Player && self.player.is_some() {
            return None;
        }
        let kind = entity.kind;
        let id = if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.entities[idx] = Some(entity);
            EntityId {
                index,
                generation: self.generations[idx],
            }
        } else {
            let index = self.entities.len() as u32;
            self.entities.push(Some(entity));
            self.generations.push(0);
            EntityId {
                index,
                generation: 0,
            }
        };
        self.count += 1;
        self.link(kind, id);
        Some(id)
    }

    /// Remove an entity immediately. A stale or already-removed id is a
    /// no-op returning false.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let idx = id.index as usize;
        if idx >= self.entities.len()
            || self.generations[idx] != id.generation
            || self.entities[idx].is_none()
        {
            return false;
        }
        let kind = self.entities[idx].as_ref().map(|e| e.kind);
        self.entities[idx] = None;
        self.generations[idx] += 1;
        self.free_list.push(id.index);
        self.count -= 1;
        if let Some(kind) = kind {
            self.unlink(kind, id);
        }
        true
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let idx = id.index as usize;
        if idx < self.entities.len() && self.generations[idx] == id.generation {
            self.entities[idx].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let idx = id.index as usize;
        if idx < self.entities.len() && self.generations[idx] == id.generation {
            self.entities[idx].as_mut()
        } else {
            None
        }
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index).and_then(|e| e.as_ref())
    }

    pub fn get_mut_by_index(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index).and_then(|e| e.as_mut())
    }

    /// Current handle for an occupied slot.
    pub fn id_of_index(&self, index: usize) -> Option<EntityId> {
        if index < self.entities.len() && self.entities[index].is_some() {
            Some(EntityId {
                index: index as u32,
                generation: self.generations[index],
            })
        } else {
            None
        }
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn bots(&self) -> &[EntityId] {
        &self.bots
    }

    pub fn food(&self) -> &[EntityId] {
        &self.food
    }

    pub fn powerups(&self) -> &[EntityId] {
        &self.powerups
    }

    /// Reclaim every slot whose entity was marked dead this tick. Returns the
    /// ids that were removed.
    pub fn sweep_dead(&mut self) -> Vec<EntityId> {
        let mut removed = Vec::new();
        for idx in 0..self.entities.len() {
            let dead = matches!(&self.entities[idx], Some(e) if !e.alive);
            if dead {
                if let Some(id) = self.id_of_index(idx) {
                    removed.push(id);
                }
            }
        }
        for id in &removed {
            self.despawn(*id);
        }
        removed
    }

    /// Iterate over (index, &Entity) for all alive entities.
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.entities.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .and_then(|e| if e.alive { Some((i, e)) } else { None })
        })
    }

    fn link(&mut self, kind: EntityKind, id: EntityId) {
        match kind {
            EntityKind::Player => self.player = Some(id),
            EntityKind::Bot => self.bots.push(id),
            EntityKind::Food => self.food.push(id),
            EntityKind::Powerup => self.powerups.push(id),
        }
    }

    fn unlink(&mut self, kind: EntityKind, id: EntityId) {
        match kind {
            EntityKind::Player => {
                if self.player == Some(id) {
                    self.player = None;
                }
            }
            EntityKind::Bot => {
                self.bots.retain(|&b| b != id);
            }
            EntityKind::Food => {
                self.food.retain(|&f| f != id);
            }
            EntityKind::Powerup => {
                self.powerups.retain(|&p| p != id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn generational_handles_invalidate_after_despawn() {
        let mut arena = EntityArena::new(1);
        let id_a = arena
            .spawn(Entity::food(vec2(10.0, 10.0), 6.0, WHITE))
            .unwrap();
        assert!(arena.get(id_a).is_some());

        assert!(arena.despawn(id_a));
        assert!(arena.get(id_a).is_none());

        let id_b = arena
            .spawn(Entity::food(vec2(20.0, 10.0), 6.0, WHITE))
            .unwrap();
        assert_eq!(id_a.index, id_b.index);
        assert_ne!(id_a.generation, id_b.generation);
    }

    #[test]
    fn despawn_of_stale_id_is_a_noop() {
        let mut arena = EntityArena::new(4);
        let id = arena
            .spawn(Entity::food(vec2(0.0, 0.0), 5.0, WHITE))
            .unwrap();
        assert!(arena.despawn(id));
        assert!(!arena.despawn(id));
        assert_eq!(arena.count, 0);
        assert!(arena.food().is_empty());
    }

    #[test]
    fn at_most_one_player() {
        let mut arena = EntityArena::new(4);
        assert!(arena.spawn(Entity::player(vec2(0.0, 0.0))).is_some());
        assert!(arena.spawn(Entity::player(vec2(1.0, 0.0))).is_none());
        assert_eq!(arena.count, 1);
    }

    #[test]
    fn kind_lists_follow_sweep() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut arena = EntityArena::new(8);
        let bot = arena
            .spawn(Entity::bot(vec2(0.0, 0.0), 30.0, WHITE, "Test", &mut rng))
            .unwrap();
        arena
            .spawn(Entity::food(vec2(5.0, 0.0), 6.0, WHITE))
            .unwrap();
        assert_eq!(arena.bots().len(), 1);
        assert_eq!(arena.food().len(), 1);

        arena.get_mut(bot).unwrap().alive = false;
        let removed = arena.sweep_dead();
        assert_eq!(removed, vec![bot]);
        assert!(arena.bots().is_empty());
        assert_eq!(arena.food().len(), 1);
    }

    #[test]
    fn iter_alive_skips_marked_dead() {
        let mut arena = EntityArena::new(2);
        let alive = arena
            .spawn(Entity::food(vec2(0.0, 0.0), 5.0, WHITE))
            .unwrap();
        let dead = arena
            .spawn(Entity::food(vec2(1.0, 0.0), 5.0, WHITE))
            .unwrap();
        arena.get_mut(dead).unwrap().alive = false;

        let indices: Vec<usize> = arena.iter_alive().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![alive.index as usize]);
    }
}
