use macroquad::prelude::*;

mod ai;
mod camera;
mod collision;
mod config;
mod effects;
mod entity;
mod growth;
mod particles;
mod player;
mod renderer;
mod simulation;
mod spatial_hash;
mod spawn;
mod stats;
mod ui;
mod world;

use entity::EntityKind;
use player::InputState;
use renderer::Renderer;
use simulation::SimState;
use ui::UiState;

fn window_conf() -> Conf {
    Conf {
        window_title: "BLOBARENA — blob arena simulator".to_string(),
        window_width: 1280,
        window_height: 800,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Seedable at construction; wall clock for interactive play.
    let seed = macroquad::miniquad::date::now().to_bits();
    let mut sim = SimState::new(seed);
    let mut renderer = Renderer::new();
    let mut ui_state = UiState::default();
    let mut last_click: (Option<entity::EntityId>, f64) = (None, 0.0);

    loop {
        let frame_dt = get_frame_time();
        let viewport = vec2(screen_width(), screen_height());

        let mut egui_wants_pointer = false;
        egui_macroquad::cfg(|ctx| {
            egui_wants_pointer = ctx.wants_pointer_input();
        });

        let mouse = Vec2::from(mouse_position());
        let input = InputState {
            up: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            dash_held: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            burst_held: is_key_down(KeyCode::Space),
            aim: if egui_wants_pointer {
                None
            } else {
                Some(mouse - viewport / 2.0)
            },
            aim_range: viewport.x.min(viewport.y) * 0.48,
            viewport,
        };

        if is_key_pressed(KeyCode::R) {
            sim.restart();
        }
        if is_key_pressed(KeyCode::E) && sim.running {
            sim.activate_shield();
        }
        if is_key_pressed(KeyCode::Q) && sim.running {
            sim.activate_bomb();
        }
        if is_key_pressed(KeyCode::Escape) {
            sim.selected = None;
        }

        if !egui_wants_pointer {
            let (_, wheel_y) = mouse_wheel();
            sim.camera.add_wheel(wheel_y);

            let world_pos = sim.camera.screen_to_world(mouse);
            if is_mouse_button_pressed(MouseButton::Left) {
                let now = get_time();
                if let Some(id) = sim.pick_entity(world_pos) {
                    let kind = sim.arena.get(id).map(|e| e.kind);
                    let recolorable =
                        matches!(kind, Some(EntityKind::Bot) | Some(EntityKind::Food));
                    if recolorable && last_click.0 == Some(id) && now - last_click.1 < 0.35 {
                        sim.cycle_color(id);
                    } else {
                        sim.click_entity(id);
                        if kind == Some(EntityKind::Powerup) {
                            sim.begin_drag(id, world_pos);
                        }
                    }
                    last_click = (Some(id), now);
                } else {
                    sim.click_world();
                    last_click = (None, now);
                }
            }
            if is_mouse_button_down(MouseButton::Left) {
                sim.drag_to(world_pos);
            }
            if is_mouse_button_released(MouseButton::Left) {
                sim.end_drag();
            }
            if is_mouse_button_pressed(MouseButton::Right) {
                sim.delete_selected();
            }
        }

        sim.tick(frame_dt, &input);

        renderer.absorb(&mut sim.fx);
        renderer.update(frame_dt);
        renderer.draw(&sim, viewport);

        ui::draw_ui(&mut sim, &mut ui_state, viewport);

        next_frame().await;
    }
}
