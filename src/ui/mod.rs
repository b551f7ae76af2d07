pub mod graphs;
pub mod inspector;
pub mod settings;
pub mod toolbar;

use macroquad::prelude::Vec2;

use crate::simulation::SimState;

/// Tracks which UI panels are open.
pub struct UiState {
    pub show_inspector: bool,
    pub show_graphs: bool,
    pub show_settings: bool,
    pub limit_food: usize,
    pub limit_bots: usize,
    pub limit_powerups: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_inspector: true,
            show_graphs: false,
            show_settings: false,
            limit_food: crate::config::FOOD_LIMIT,
            limit_bots: crate::config::BOT_LIMIT,
            limit_powerups: crate::config::POWERUP_LIMIT,
        }
    }
}

/// Draw all egui panels on top of the scene.
pub fn draw_ui(sim: &mut SimState, ui_state: &mut UiState, viewport: Vec2) {
    egui_macroquad::ui(|ctx| {
        toolbar::draw_toolbar(ctx, sim, ui_state);

        if ui_state.show_inspector {
            inspector::draw_inspector(ctx, sim);
        }
        if ui_state.show_graphs {
            graphs::draw_graphs(ctx, &sim.stats);
        }
        if ui_state.show_settings {
            settings::draw_settings(ctx, sim, ui_state, viewport);
        }

        draw_end_overlay(ctx, sim);
    });

    egui_macroquad::draw();
}

/// Game-over card. The final frame stays visible and inspectable behind it
/// until the player restarts.
fn draw_end_overlay(ctx: &egui::Context, sim: &mut SimState) {
    let Some(outcome) = sim.outcome else { return };

    egui::Window::new("Round over")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.heading(outcome.title());
            ui.label(format!("Final score: {}", sim.score.score));
            ui.label(format!(
                "Time left: {}",
                crate::simulation::format_time(sim.time_left)
            ));
            ui.separator();
            if ui.button("Restart (R)").clicked() {
                sim.restart();
            }
        });
}
