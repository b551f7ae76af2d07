use egui;
use macroquad::prelude::Vec2;

use super::UiState;
use crate::simulation::SimState;
use crate::world::WorldPreset;

/// Developer tools: arena presets, live entity limits and spawn/input
/// toggles.
pub fn draw_settings(
    ctx: &egui::Context,
    sim: &mut SimState,
    ui_state: &mut UiState,
    viewport: Vec2,
) {
    egui::Window::new("Dev Tools")
        .default_pos(egui::pos2(300.0, 80.0))
        .default_size(egui::vec2(260.0, 340.0))
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Spawning");
            let auto = if sim.auto_spawn { "ON" } else { "OFF" };
            if ui.button(format!("Auto spawn: {auto}")).clicked() {
                sim.auto_spawn = !sim.auto_spawn;
            }

            ui.separator();
            ui.heading("Mouse speed");
            ui.label("Default is constant speed regardless of cursor distance.");
            let mode = if sim.variable_mouse_speed { "ON" } else { "OFF" };
            if ui.button(format!("Variable speed: {mode}")).clicked() {
                sim.variable_mouse_speed = !sim.variable_mouse_speed;
            }

            ui.separator();
            ui.heading("World size");
            ui.horizontal(|ui| {
                for preset in [WorldPreset::Small, WorldPreset::Medium, WorldPreset::Large] {
                    let selected = sim.preset == preset;
                    if ui.selectable_label(selected, preset.label()).clicked() {
                        sim.set_world_preset(preset, viewport);
                    }
                }
            });
            ui.label(format!(
                "Current: {} ({:.0}x{:.0})",
                sim.preset.label(),
                sim.world.width,
                sim.world.height
            ));

            ui.separator();
            ui.heading("Entity limits");
            egui::Grid::new("limits_grid").num_columns(2).show(ui, |ui| {
                ui.label("Food");
                ui.add(egui::DragValue::new(&mut ui_state.limit_food).range(0..=2000));
                ui.end_row();
                ui.label("Bots");
                ui.add(egui::DragValue::new(&mut ui_state.limit_bots).range(0..=200));
                ui.end_row();
                ui.label("Powerups");
                ui.add(egui::DragValue::new(&mut ui_state.limit_powerups).range(0..=200));
                ui.end_row();
            });
            if ui.button("Apply limits").clicked() {
                sim.set_limits(
                    ui_state.limit_food,
                    ui_state.limit_bots,
                    ui_state.limit_powerups,
                );
            }
            ui.label(format!(
                "Applied: food {}, bots {}, powerups {}",
                sim.limits.food, sim.limits.bots, sim.limits.powerups
            ));

            ui.separator();
            ui.heading("Info");
            ui.label(format!(
                "Spatial cells: {}x{}",
                sim.spatial.cols, sim.spatial.rows
            ));
            ui.label(format!("Entities: {}", sim.arena.count));
        });
}
