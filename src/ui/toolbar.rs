use egui;

use super::UiState;
use crate::simulation::{format_time, SimState};

/// Slim status strip: session KPIs, ability readiness, spawn buttons and
/// panel toggles.
pub fn draw_toolbar(ctx: &egui::Context, sim: &mut SimState, ui_state: &mut UiState) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.add_space(3.0);
        ui.horizontal_wrapped(|ui| {
            title_badge(ui, "BLOBARENA");

            ui.separator();
            metric_chip(ui, "Score", format!("{}", sim.score.score.max(0)));
            metric_chip(
                ui,
                "Mass",
                format!("{}", sim.player().map(|p| p.mass as i64).unwrap_or(0)),
            );
            metric_chip(ui, "Time", format_time(sim.time_left));
            let combo = if sim.score.combo > 0 {
                format!("x{}", sim.score.combo)
            } else {
                "-".to_string()
            };
            metric_chip(ui, "Combo", combo);
            metric_chip(ui, "Bots", format!("{}", sim.arena.bots().len()));
            metric_chip(ui, "Threats", format!("{}", sim.threat_count()));
            metric_chip(ui, "FPS", format!("{}", macroquad::time::get_fps()));

            ui.separator();
            compact_group(ui, "Spawn", |ui| {
                if ui.button("Food +25").clicked() {
                    sim.add_food(25);
                }
                if ui.button("Bots +3").clicked() {
                    sim.add_bots(3);
                }
                if ui.button("Power +2").clicked() {
                    sim.add_powerups(2);
                }
                if ui.button("Reset (R)").clicked() {
                    sim.restart();
                }
            });

            compact_group(ui, "Panels", |ui| {
                ui.toggle_value(&mut ui_state.show_inspector, "Inspector");
                ui.toggle_value(&mut ui_state.show_graphs, "Graphs");
                ui.toggle_value(&mut ui_state.show_settings, "Dev");
            });
        });

        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            let a = &sim.abilities;
            ability_chip(ui, "Dash", a.dash_cd <= 0.0, cd_text(a.dash_cd));
            ability_chip(ui, "Shield", a.shield_cd <= 0.0, cd_text(a.shield_cd));
            ability_chip(
                ui,
                "Bomb",
                a.bomb_charges > 0,
                format!("{}", a.bomb_charges),
            );
            let magnet = if a.magnet_time > 0.0 {
                format!("{:.1}s", a.magnet_time)
            } else {
                "OFF".to_string()
            };
            ability_chip(ui, "Magnet", a.magnet_time > 0.0, magnet);
            ability_chip(
                ui,
                "Burst",
                a.burst_energy > 0.0,
                format!("{}%", (a.burst_energy * 100.0).round() as i32),
            );
        });
        ui.add_space(3.0);
    });
}

fn cd_text(cd: f32) -> String {
    if cd <= 0.0 {
        "READY".to_string()
    } else {
        format!("{cd:.1}s")
    }
}

fn title_badge(ui: &mut egui::Ui, label: &str) {
    let text = egui::RichText::new(label)
        .strong()
        .color(egui::Color32::from_rgb(120, 205, 255));
    ui.label(text);
}

fn compact_group(ui: &mut egui::Ui, heading: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(heading)
                    .small()
                    .color(egui::Color32::from_rgb(150, 170, 185)),
            );
            add_contents(ui);
        });
    });
}

fn metric_chip(ui: &mut egui::Ui, key: &str, value: String) {
    let text = egui::RichText::new(format!("{key}: {value}"))
        .small()
        .color(egui::Color32::from_rgb(205, 215, 225));
    ui.group(|ui| {
        ui.label(text);
    });
}

fn ability_chip(ui: &mut egui::Ui, key: &str, ready: bool, value: String) {
    let color = if ready {
        egui::Color32::from_rgb(120, 230, 150)
    } else {
        egui::Color32::from_rgb(160, 160, 170)
    };
    ui.group(|ui| {
        ui.label(
            egui::RichText::new(format!("{key}: {value}"))
                .small()
                .color(color),
        );
    });
}
