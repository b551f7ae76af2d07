use egui;

use crate::simulation::SimState;

/// Selected-entity readout plus the live leaderboard.
pub fn draw_inspector(ctx: &egui::Context, sim: &SimState) {
    egui::Window::new("Inspector")
        .default_pos(egui::pos2(12.0, 80.0))
        .default_size(egui::vec2(220.0, 320.0))
        .resizable(true)
        .show(ctx, |ui| {
            match sim.selected.and_then(|id| sim.arena.get(id)) {
                Some(e) => {
                    ui.label(format!("Type: {}", e.kind.label()));
                    if let Some(name) = e.name {
                        ui.label(format!("Name: {name}"));
                    }
                    if let Some(power) = e.power {
                        ui.label(format!("Power: {}", power.label()));
                    }
                    ui.label(format!("Radius: {:.0}", e.radius));
                    ui.label(format!("Mass: {:.0}", e.mass));
                    ui.label(format!("Pos: {:.0}, {:.0}", e.pos.x, e.pos.y));
                }
                None => {
                    ui.label("Click an entity to inspect it.");
                }
            }

            ui.separator();
            ui.heading("Leaderboard");
            for (rank, row) in sim.leaderboard(6).iter().enumerate() {
                let label = format!("{}. {} — {}", rank + 1, row.name, row.mass as i64);
                if row.is_player {
                    ui.colored_label(egui::Color32::from_rgb(120, 205, 255), label);
                } else {
                    ui.label(label);
                }
            }
        });
}
