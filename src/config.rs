// All tunable simulation constants in one place.

use macroquad::prelude::Color;

// World presets
pub const WORLD_SMALL_W: f32 = 3800.0;
pub const WORLD_SMALL_H: f32 = 2600.0;
pub const WORLD_MEDIUM_W: f32 = 5000.0;
pub const WORLD_MEDIUM_H: f32 = 3400.0;
pub const WORLD_LARGE_W: f32 = 7200.0;
pub const WORLD_LARGE_H: f32 = 4800.0;

// Simulation
pub const MAX_TICK_DT: f32 = 0.033;
pub const ROUND_TIME: f32 = 120.0;

// Spatial hash
pub const SPATIAL_CELL_SIZE: f32 = 160.0;

// Population limits (defaults; live-tunable via the dev panel)
pub const FOOD_LIMIT: usize = 360;
pub const BOT_LIMIT: usize = 28;
pub const POWERUP_LIMIT: usize = 12;

// Spawn cadence (ms accumulators)
pub const FOOD_SPAWN_EVERY_MS: f32 = 85.0;
pub const BOT_SPAWN_EVERY_MS: f32 = 900.0;
pub const POWER_SPAWN_EVERY_MS: f32 = 2600.0;
pub const THREAT_CHECK_EVERY_MS: f32 = 900.0;
pub const FOOD_SPAWN_BATCH: usize = 3;
pub const POWER_SPAWN_CHANCE: f32 = 0.75;

// Initial population
pub const INITIAL_FOOD: usize = 240;
pub const INITIAL_BOTS: usize = 18;
pub const INITIAL_POWERUPS: usize = 4;

// Growth and economy
pub const MASS_FLOOR: f32 = 8.0;
pub const RADIUS_BASE: f32 = 10.0;
pub const RADIUS_MASS_SCALE: f32 = 2.25;
pub const DIMINISH_K: f32 = 70.0;
pub const DIMINISH_MASS_FACTOR: f32 = 0.62;
pub const DIMINISH_FLOOR: f32 = 0.10;
pub const PLAYER_FOOD_GAIN: f32 = 0.16;
pub const BOT_FOOD_GAIN: f32 = 0.78;
pub const BOT_EAT_BOT_ENABLED: bool = true;
pub const BOT_PASSIVE_GROWTH_PER_SEC: f32 = 0.12;

// Scoring
pub const SCORE_FOOD: i64 = 1;
pub const SCORE_POWERUP: i64 = 6;
pub const SCORE_EAT_BOT: i64 = 28;
pub const SCORE_BOMB_FOOD: i64 = 1;
pub const SCORE_BOMB_BOT: i64 = 10;
pub const COMBO_WINDOW: f32 = 0.95;

// Speed curves
pub const PLAYER_SPEED_BASE: f32 = 330.0;
pub const PLAYER_SPEED_SLOPE: f32 = 12.2;
pub const PLAYER_SPEED_MIN: f32 = 160.0;
pub const PLAYER_SPEED_MAX: f32 = 330.0;
pub const BOT_SPEED_BASE: f32 = 305.0;
pub const BOT_SPEED_SLOPE: f32 = 10.6;
pub const BOT_SPEED_MIN: f32 = 120.0;
pub const BOT_SPEED_MAX: f32 = 305.0;
pub const PLAYER_VEL_LERP: f32 = 0.18;
pub const BOT_VEL_LERP: f32 = 0.10;

// Player
pub const PLAYER_START_MASS: f32 = 24.0;
pub const PLAYER_EAT_RATIO: f32 = 1.12;
pub const PLAYER_DIE_RATIO: f32 = 1.10;
pub const PLAYER_EAT_TRANSFER: f32 = 0.38;
pub const AIM_DEADZONE_FACTOR: f32 = 0.16;

// Abilities
pub const DASH_COOLDOWN: f32 = 1.0;
pub const DASH_BOOST: f32 = 2.55;
pub const SHIELD_DURATION: f32 = 2.2;
pub const SHIELD_COOLDOWN: f32 = 6.2;
pub const SHIELD_KNOCKBACK: f32 = 60.0;
pub const BOMB_COOLDOWN: f32 = 2.2;
pub const BOMB_RADIUS: f32 = 190.0;
pub const BOMB_CHARGE_CAP: u32 = 6;
pub const BOMB_BEATABLE_RATIO: f32 = 0.92;
pub const MAGNET_DURATION: f32 = 4.8;
pub const MAGNET_COOLDOWN: f32 = 7.5;
pub const MAGNET_RADIUS: f32 = 270.0;
pub const MAGNET_PULL: f32 = 590.0;
pub const MAGNET_PULL_SCALE: f32 = 0.55;
pub const BURST_DRAIN_PER_SEC: f32 = 0.55;
pub const BURST_REGEN_PER_SEC: f32 = 0.28;
pub const BURST_MIN_MASS: f32 = 16.0;
pub const BURST_MASS_COST_PER_SEC: f32 = 0.52;
pub const BURST_BOOST: f32 = 1.75;
pub const PICKUP_DASH_REFUND: f32 = 1.0;
pub const PICKUP_SHIELD_REFUND: f32 = 2.0;

// Bot AI
pub const BOT_RETARGET_MIN: f32 = 0.35;
pub const BOT_RETARGET_MAX: f32 = 0.9;
pub const BOT_FIRST_RETARGET_MIN: f32 = 0.2;
pub const BOT_FIRST_RETARGET_MAX: f32 = 1.0;
pub const BOT_BIGGER_RATIO: f32 = 1.08;
pub const BOT_SMALLER_RATIO: f32 = 0.86;
pub const BOT_FLEE_RATIO: f32 = 1.18;
pub const BOT_FLEE_FOOD_BLEND: f32 = 0.25;
pub const BOT_HUNT_CHANCE_MIN: f32 = 0.40;
pub const BOT_HUNT_CHANCE_MAX: f32 = 0.70;
pub const BOT_AGGRO_SPEED_MIN: f32 = 1.06;
pub const BOT_AGGRO_SPEED_MAX: f32 = 1.24;
pub const BOT_EAT_BOT_RATIO: f32 = 1.18;
pub const BOT_EAT_BOT_TRANSFER: f32 = 0.55;
pub const FOOD_SAMPLES: usize = 18;
pub const WALL_PAD: f32 = 180.0;
pub const WALL_WEIGHT: f32 = 0.95;
pub const WANDER_CHANCE: f32 = 0.02;
pub const WANDER_SPEED_MIN: f32 = 40.0;
pub const WANDER_SPEED_MAX: f32 = 120.0;

// Spawner
pub const FOOD_MARGIN: f32 = 36.0;
pub const FOOD_RADIUS_MIN: u32 = 5;
pub const FOOD_RADIUS_MAX: u32 = 9;
pub const FOOD_MASS_PER_RADIUS: f32 = 0.55;
pub const POWERUP_MARGIN: f32 = 120.0;
pub const POWERUP_MASS: f32 = 6.0;
pub const POWERUP_RADIUS: f32 = 16.0;
pub const BOT_SPAWN_MARGIN: f32 = 80.0;
pub const BOT_SPAWN_SAFE_DIST: f32 = 560.0;
pub const BOT_SPAWN_TRIES: usize = 10;
pub const BOT_MASS_MIN: f32 = 14.0;
pub const BOT_MASS_MAX: f32 = 480.0;
pub const THREAT_MASS_MIN: f32 = 18.0;
pub const THREAT_MASS_MAX: f32 = 520.0;
pub const THREAT_RATIO: f32 = 1.12;
pub const THREAT_MIN_COUNT: usize = 3;
pub const BOT_SPAWN_SPEED_MIN: f32 = 50.0;
pub const BOT_SPAWN_SPEED_MAX: f32 = 140.0;

// Camera
pub const ZOOM_BASE: f32 = 1.18;
pub const ZOOM_MASS_SLOPE: f32 = 0.0138;
pub const ZOOM_MASS_MIN: f32 = 0.66;
pub const ZOOM_MASS_MAX: f32 = 1.20;
pub const WHEEL_ZOOM_STEP: f32 = 0.03;
pub const WHEEL_ZOOM_RANGE: f32 = 0.18;
pub const ZOOM_MIN: f32 = 0.62;
pub const ZOOM_MAX: f32 = 1.23;
pub const CAMERA_LERP: f32 = 0.12;

// Palette
pub const PLAYER_COLORS: [Color; 4] = [
    Color::new(0.27, 0.79, 1.0, 1.0),
    Color::new(0.61, 0.42, 1.0, 1.0),
    Color::new(0.34, 1.0, 0.54, 1.0),
    Color::new(1.0, 0.83, 0.42, 1.0),
];
pub const FOOD_COLORS: [Color; 3] = [
    Color::new(0.34, 1.0, 0.54, 1.0),
    Color::new(0.27, 0.79, 1.0, 1.0),
    Color::new(1.0, 0.83, 0.42, 1.0),
];
pub const BOT_COLORS: [Color; 3] = [
    Color::new(1.0, 0.29, 0.43, 1.0),
    Color::new(1.0, 0.48, 0.29, 1.0),
    Color::new(1.0, 0.29, 0.84, 1.0),
];
pub const POWER_COLORS: [Color; 2] = [
    Color::new(1.0, 0.83, 0.42, 1.0),
    Color::new(0.27, 0.79, 1.0, 1.0),
];

// Effect text colors
pub const FX_SCORE: Color = Color::new(0.34, 1.0, 0.54, 1.0);
pub const FX_INFO: Color = Color::new(0.27, 0.79, 1.0, 1.0);
pub const FX_GOLD: Color = Color::new(1.0, 0.83, 0.42, 1.0);
pub const FX_DANGER: Color = Color::new(1.0, 0.29, 0.43, 1.0);

pub const BOT_NAMES: [&str; 30] = [
    "VoltShade", "MossCircuit", "KiloDrifter", "EmberLynx", "NullOtter", "PranaBolt",
    "GritWasp", "OxideFern", "LumenJackal", "CinderMoth", "ZealQuark", "HavocKelp",
    "TundraByte", "RiftBadger", "SolarWren", "MurkPiston", "JadeVandal", "FluxHeron",
    "OnyxSprout", "GaleRonin", "PetalForge", "StaticNewt", "CobaltThorn", "DriftMantis",
    "NimbusEel", "RustHalo", "VexPoppy", "SableComet", "TorqueFinch", "GlowVerge",
];
