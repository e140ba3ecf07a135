//! The right-hand control panel: search, mode toggles, tile styles, and
//! the location history list.

use eframe::egui;
use eframe::epaint::StrokeKind;

use super::state::{MapApp, Marker};
use crate::constants::{FLASH_FRAMES, FOCUS_ZOOM};
use crate::tiles::TILE_STYLES;
use crate::types::InteractionMode;

/// Pending actions collected while iterating the history rows.
enum HistoryAction {
    Jump(usize),
    Delete(usize),
}

impl MapApp {
    /// Renders the full side panel.
    pub fn draw_side_panel(&mut self, ui: &mut egui::Ui) {
        self.draw_search_field(ui);
        ui.add_space(4.0);
        self.draw_controls(ui);
        ui.separator();
        self.draw_style_buttons(ui);
        ui.separator();
        self.draw_routing_controls(ui);
        ui.separator();
        self.draw_history_list(ui);
    }

    /// Search field: Enter submits, failures flash the border red.
    fn draw_search_field(&mut self, ui: &mut egui::Ui) {
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.search.query)
                .hint_text("Search for a place and press Enter")
                .desired_width(f32::INFINITY),
        );

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.submit_search();
        }

        if self.search.error_flash > 0 {
            // Fade the red border back out over the remaining frames.
            let strength = self.search.error_flash as f32 / FLASH_FRAMES as f32;
            let color = egui::Color32::RED.gamma_multiply(strength);
            ui.painter().rect_stroke(
                response.rect.expand(2.0),
                4.0,
                egui::Stroke::new(2.0, color),
                StrokeKind::Outside,
            );
            self.search.error_flash -= 1;
            ui.ctx().request_repaint();
        }
    }

    /// Map clearing plus polygon finish/cancel and the drawing toggle.
    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Clear Map").clicked() {
                self.clear_all();
            }
            if ui.button("Finish Polygon").clicked() {
                let effects = self.controller.finish_polygon();
                self.apply_effects(effects);
            }
            if ui.button("Cancel Polygon").clicked() {
                let effects = self.controller.cancel_polygon();
                self.apply_effects(effects);
            }
        });

        let drawing = self.controller.mode() == InteractionMode::DrawingPolygon;
        let label = if drawing {
            "Draw Area: On"
        } else {
            "Draw Area: Off"
        };
        if ui
            .add_sized([ui.available_width(), 24.0], egui::SelectableLabel::new(drawing, label))
            .clicked()
        {
            self.toggle_polygon_mode();
        }
    }

    /// Grid of tile style buttons, three per row, active style highlighted.
    fn draw_style_buttons(&mut self, ui: &mut egui::Ui) {
        let mut selected: Option<&'static str> = None;
        egui::Grid::new("style_buttons")
            .num_columns(3)
            .show(ui, |ui| {
                for (idx, style) in TILE_STYLES.iter().enumerate() {
                    let active = self.style_key == style.key;
                    if ui.selectable_label(active, style.name).clicked() {
                        selected = Some(style.key);
                    }
                    if idx % 3 == 2 {
                        ui.end_row();
                    }
                }
            });
        if let Some(key) = selected {
            self.change_style(key);
        }
    }

    /// Routing mode toggle and route clearing.
    fn draw_routing_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let routing = self.controller.mode() == InteractionMode::PickingRoute;
            let label = if routing {
                "Routing: On"
            } else {
                "Routing: Off"
            };
            if ui.selectable_label(routing, label).clicked() {
                self.toggle_routing_mode();
            }
            if ui.button("Clear Route").clicked() {
                self.clear_route();
            }
        });
    }

    /// Scrollable history list: a jump button and a delete button per row.
    fn draw_history_list(&mut self, ui: &mut egui::Ui) {
        let mut action: Option<HistoryAction> = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for (idx, entry) in self.history.entries().iter().enumerate() {
                    ui.horizontal(|ui| {
                        if ui.button("✕").clicked() {
                            action = Some(HistoryAction::Delete(idx));
                        }
                        let jump = ui.add(
                            egui::Button::new(&entry.label)
                                .wrap_mode(egui::TextWrapMode::Truncate)
                                .min_size(egui::vec2(ui.available_width(), 0.0)),
                        );
                        if jump.on_hover_text(&entry.address).clicked() {
                            action = Some(HistoryAction::Jump(idx));
                        }
                    });
                }
            });

        match action {
            Some(HistoryAction::Jump(idx)) => self.jump_to_history_entry(idx),
            Some(HistoryAction::Delete(idx)) => self.history.remove(idx),
            None => {}
        }
    }

    /// Focuses a history entry and drops a marker for it.
    pub(crate) fn jump_to_history_entry(&mut self, idx: usize) {
        let Some(entry) = self.history.entries().get(idx) else {
            return;
        };
        let point = entry.point();
        let label = entry.address.clone();
        self.focus_map(point, Some(FOCUS_ZOOM), true);
        self.overlay.markers.push(Marker { point, label });
    }
}
