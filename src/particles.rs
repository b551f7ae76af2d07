use macroquad::prelude::*;

const MAX_PARTICLES: usize = 600;
const BURST_COUNT: usize = 10;
const BURST_SPREAD: f32 = 70.0;
const BURST_LIFETIME: f32 = 0.55;

#[derive(Clone, Copy)]
struct Particle {
    pos: Vec2,
    velocity: Vec2,
    color: Color,
    life: f32,
    max_life: f32,
    size: f32,
}

/// Presentation-side particle pool, fed by the core's burst effects.
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
        }
    }

    /// Radial scatter at a consumption/removal site.
    pub fn emit_burst(&mut self, pos: Vec2, color: Color) {
        for _ in 0..BURST_COUNT {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let vel = vec2(
                rand::gen_range(-BURST_SPREAD, BURST_SPREAD),
                rand::gen_range(-BURST_SPREAD, BURST_SPREAD),
            );
            self.particles.push(Particle {
                pos,
                velocity: vel,
                color,
                life: BURST_LIFETIME * rand::gen_range(0.7, 1.0),
                max_life: BURST_LIFETIME,
                size: rand::gen_range(1.5, 3.5),
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.pos += p.velocity * dt;
            p.velocity *= 1.0 - 2.0 * dt; // drag
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn draw(&self) {
        for p in &self.particles {
            let t = (p.life / p.max_life).clamp(0.0, 1.0);
            let color = Color::new(p.color.r, p.color.g, p.color.b, t * p.color.a);
            draw_circle(p.pos.x, p.pos.y, p.size * (0.3 + 0.7 * t), color);
        }
    }
}
