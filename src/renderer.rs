use macroquad::prelude::*;

use crate::config;
use crate::effects::{Effect, FxQueue};
use crate::entity::EntityKind;
use crate::particles::ParticleSystem;
use crate::simulation::SimState;

const BG_COLOR: Color = Color::new(0.03, 0.04, 0.09, 1.0);
const ARENA_COLOR: Color = Color::new(0.05, 0.07, 0.13, 1.0);
const GRID_LINE_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.04);
const GRID_LINE_SPACING: f32 = 300.0;
const FLOAT_LIFETIME: f32 = 0.9;
const FLOAT_RISE: f32 = 34.0;

struct FloatFx {
    text: String,
    pos: Vec2,
    color: Color,
    life: f32,
}

/// Owns everything transient on the presentation side: drained core effects,
/// particles, floating score text.
pub struct Renderer {
    particles: ParticleSystem,
    floats: Vec<FloatFx>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            particles: ParticleSystem::new(),
            floats: Vec::new(),
        }
    }

    /// Drain the core's effect queue into local animations.
    pub fn absorb(&mut self, fx: &mut FxQueue) {
        for effect in fx.drain() {
            match effect {
                Effect::FloatText { text, pos, color } => self.floats.push(FloatFx {
                    text,
                    pos,
                    color,
                    life: FLOAT_LIFETIME,
                }),
                Effect::Burst { pos, color } => self.particles.emit_burst(pos, color),
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.particles.update(dt);
        for f in &mut self.floats {
            f.pos.y -= FLOAT_RISE * dt;
            f.life -= dt;
        }
        self.floats.retain(|f| f.life > 0.0);
    }

    pub fn draw(&self, sim: &SimState, viewport: Vec2) {
        clear_background(BG_COLOR);

        let zoom = sim.camera.zoom;
        let cam = Camera2D {
            target: sim.camera.view_center(viewport),
            zoom: vec2(2.0 * zoom / viewport.x, -2.0 * zoom / viewport.y),
            ..Default::default()
        };
        set_camera(&cam);

        draw_arena(sim);
        draw_entities(sim);
        self.particles.draw();
        self.draw_floats();

        set_default_camera();
    }

    fn draw_floats(&self) {
        for f in &self.floats {
            let t = (f.life / FLOAT_LIFETIME).clamp(0.0, 1.0);
            let color = Color::new(f.color.r, f.color.g, f.color.b, t);
            draw_text(&f.text, f.pos.x, f.pos.y, 18.0, color);
        }
    }
}

fn draw_arena(sim: &SimState) {
    let w = sim.world.width;
    let h = sim.world.height;
    draw_rectangle(0.0, 0.0, w, h, ARENA_COLOR);

    let mut x = GRID_LINE_SPACING;
    while x < w {
        draw_line(x, 0.0, x, h, 1.0, GRID_LINE_COLOR);
        x += GRID_LINE_SPACING;
    }
    let mut y = GRID_LINE_SPACING;
    while y < h {
        draw_line(0.0, y, w, y, 1.0, GRID_LINE_COLOR);
        y += GRID_LINE_SPACING;
    }

    draw_rectangle_lines(0.0, 0.0, w, h, 4.0, Color::new(1.0, 1.0, 1.0, 0.18));
}

fn draw_entities(sim: &SimState) {
    // Food first, player last, so the important discs sit on top.
    for pass in [
        EntityKind::Food,
        EntityKind::Powerup,
        EntityKind::Bot,
        EntityKind::Player,
    ] {
        for (idx, e) in sim.arena.iter_alive() {
            if e.kind != pass {
                continue;
            }
            draw_circle(e.pos.x, e.pos.y, e.radius, e.color);

            match e.kind {
                EntityKind::Player => {
                    draw_circle_lines(e.pos.x, e.pos.y, e.radius, 2.0, WHITE);
                    if sim.abilities.shield_active() {
                        draw_circle_lines(
                            e.pos.x,
                            e.pos.y,
                            e.radius + 6.0,
                            3.0,
                            config::FX_SCORE,
                        );
                    }
                    let label = "YOU";
                    let dims = measure_text(label, None, 16, 1.0);
                    draw_text(
                        label,
                        e.pos.x - dims.width / 2.0,
                        e.pos.y + dims.height / 2.0,
                        16.0,
                        BLACK,
                    );
                }
                EntityKind::Bot => {
                    if let Some(name) = e.name {
                        let dims = measure_text(name, None, 14, 1.0);
                        draw_text(
                            name,
                            e.pos.x - dims.width / 2.0,
                            e.pos.y - e.radius - 6.0,
                            14.0,
                            Color::new(1.0, 1.0, 1.0, 0.75),
                        );
                    }
                }
                EntityKind::Powerup => {
                    if let Some(power) = e.power {
                        let glyph = power.glyph();
                        let dims = measure_text(glyph, None, 16, 1.0);
                        draw_text(
                            glyph,
                            e.pos.x - dims.width / 2.0,
                            e.pos.y + dims.height / 2.0,
                            16.0,
                            BLACK,
                        );
                    }
                }
                EntityKind::Food => {}
            }

            if sim.selected == sim.arena.id_of_index(idx) && sim.selected.is_some() {
                draw_circle_lines(e.pos.x, e.pos.y, e.radius + 3.0, 1.5, WHITE);
            }
        }
    }
}
