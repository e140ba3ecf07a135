//! User interface components and wiring for the map viewer.
//!
//! This module owns the egui shell: the main application struct, panel
//! layout, the walkers map integration, and the glue that executes the
//! interaction controller's effects against the overlay state.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main MapApp
//! - `map_panel` - The walkers map, overlay drawing, and click capture
//! - `side_panel` - Search, mode toggles, tile styles, history list

mod map_panel;
mod side_panel;
mod state;

#[cfg(test)]
mod tests;

pub use state::MapApp;

use std::time::Instant;

use eframe::egui;

use crate::constants::{DEFAULT_ZOOM, FLASH_FRAMES, FOCUS_ZOOM, PAN_DURATION_MS, PAN_STEPS};
use crate::interaction::{MapEffect, RouteProvider};
use crate::services::{self, ServiceError};
use crate::tiles::style_by_key;
use crate::types::{GeoPoint, HistoryEntry, InteractionMode, RoutePlan};
use state::Marker;

/// Stand-in route provider used when the real client failed to build.
struct RouterUnavailable;

impl RouteProvider for RouterUnavailable {
    fn route(&self, _start: GeoPoint, _end: GeoPoint) -> services::Result<RoutePlan> {
        Err(ServiceError::NoResults)
    }
}

impl eframe::App for MapApp {
    /// Persist UI preferences and flush the history between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string("app_state", json);
            }
            Err(err) => {
                eprintln!("Failed to serialize app state: {err}");
            }
        }
        self.history.save();
    }

    /// Main update function called by egui for each frame.
    ///
    /// Applies the style-matched visuals, advances any camera animation,
    /// and lays out the status bar, side panel, and map. Click feedback
    /// from the map plugin is processed after the panels have drawn.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let style = style_by_key(&self.style_key);
        let visuals = if style.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        // Apply the startup zoom once; the centre comes from the home
        // position passed to the map widget.
        if !self.applied_initial_view {
            let _ = self.map_memory.set_zoom(DEFAULT_ZOOM);
            self.applied_initial_view = true;
        }

        self.tick_animation(ctx);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.draw_status_bar(ui);
        });

        egui::SidePanel::right("side_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                self.draw_side_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_map(ui);
        });

        self.handle_map_feedback();
    }
}

impl MapApp {
    /// Advances the camera animation and schedules the next repaint.
    fn tick_animation(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        if let Some(position) = self.animator.step_due(now) {
            self.set_map_center(position);
        }
        if let Some(delay) = self.animator.time_until_next_step(now) {
            ctx.request_repaint_after(delay);
        }
    }

    /// Resolves the search box contents and focuses the result.
    ///
    /// Empty input and every service failure surface as the red flash on
    /// the field; a hit records history, drops a marker, and pans over.
    pub(crate) fn submit_search(&mut self) {
        let query = self.search.query.trim().to_string();
        if query.is_empty() {
            self.search.error_flash = FLASH_FRAMES;
            return;
        }
        let Some(geocoder) = &self.geocoder else {
            self.search.error_flash = FLASH_FRAMES;
            return;
        };

        match geocoder.search(&query) {
            Ok(place) => {
                self.history.add(HistoryEntry::new(&place.address, place.point));
                self.search.query.clear();
                self.focus_map(place.point, Some(FOCUS_ZOOM), true);
                self.overlay.markers.push(Marker {
                    point: place.point,
                    label: place.address,
                });
            }
            Err(err) => {
                log::warn!("geocoding \"{query}\" failed: {err}");
                self.search.error_flash = FLASH_FRAMES;
            }
        }
    }

    /// Routes a raw map click through the interaction controller.
    pub(crate) fn on_map_click(&mut self, point: GeoPoint) {
        let effects = match &self.router {
            Some(router) => self.controller.handle_click(point, router),
            None => self.controller.handle_click(point, &RouterUnavailable),
        };
        self.apply_effects(effects);
    }

    /// Executes controller effects against the overlay and app state.
    pub(crate) fn apply_effects(&mut self, effects: Vec<MapEffect>) {
        for effect in effects {
            match effect {
                MapEffect::AddHistory { point } => {
                    self.history.add(HistoryEntry::new("", point));
                }
                MapEffect::PlaceMarker { point, label } => {
                    self.overlay.markers.push(Marker { point, label });
                }
                MapEffect::PolygonPreview { points } => {
                    self.overlay.preview = points;
                }
                MapEffect::ClearPolygonPreview => {
                    self.overlay.preview.clear();
                }
                MapEffect::CommitPolygon { points } => {
                    self.overlay.preview.clear();
                    self.overlay.polygons.push(points);
                }
                MapEffect::RouteStartMarker { point } => {
                    self.overlay.route_start = Some(point);
                }
                MapEffect::RouteEndMarker { point } => {
                    self.overlay.route_end = Some(point);
                }
                MapEffect::DrawRoute { plan } => {
                    self.overlay.route = Some(plan);
                }
                MapEffect::FocusCamera { point } => {
                    self.focus_map(point, None, true);
                }
                MapEffect::Status(message) => {
                    self.status.message = Some(message);
                }
            }
        }
    }

    /// Pans the camera to `point`, optionally changing zoom first.
    ///
    /// A smooth focus starts (and thereby replaces) the camera animation;
    /// a hard focus cancels it and re-centres immediately.
    pub(crate) fn focus_map(&mut self, point: GeoPoint, zoom: Option<f64>, smooth: bool) {
        if let Some(zoom) = zoom {
            let _ = self.map_memory.set_zoom(zoom);
        }
        if smooth {
            let from = self.map_center();
            let first = self
                .animator
                .start(from, point, PAN_DURATION_MS, PAN_STEPS, Instant::now());
            self.set_map_center(first);
        } else {
            self.animator.cancel();
            self.set_map_center(point);
        }
    }

    /// Toggles polygon drawing on or off.
    pub(crate) fn toggle_polygon_mode(&mut self) {
        let effects = if self.controller.mode() == InteractionMode::DrawingPolygon {
            self.controller.exit_to_idle()
        } else {
            self.controller.enter_polygon_mode()
        };
        self.apply_effects(effects);
        if self.controller.mode() == InteractionMode::Idle {
            self.status.message = None;
        }
    }

    /// Toggles route picking on or off.
    pub(crate) fn toggle_routing_mode(&mut self) {
        let effects = if self.controller.mode() == InteractionMode::PickingRoute {
            self.controller.exit_to_idle()
        } else {
            self.controller.enter_route_mode()
        };
        self.apply_effects(effects);
        if self.controller.mode() == InteractionMode::Idle {
            self.status.message = None;
        }
    }

    /// Removes the drawn route, its endpoint markers, and any half-made
    /// pick.
    pub(crate) fn clear_route(&mut self) {
        self.controller.clear_route_selection();
        self.overlay.route = None;
        self.overlay.route_start = None;
        self.overlay.route_end = None;
    }

    /// Clears markers, history, polygons, and routes in one go.
    pub(crate) fn clear_all(&mut self) {
        self.overlay.markers.clear();
        self.history.clear();
        let effects = self.controller.cancel_polygon();
        self.apply_effects(effects);
        self.overlay.polygons.clear();
        self.clear_route();
        self.status.message = None;
    }

    /// Drains the plugin mailbox: marker clicks show their info, map
    /// clicks go to the controller, hovering updates the cursor readout.
    fn handle_map_feedback(&mut self) {
        let (clicked_map, clicked_marker, hover) = {
            let Ok(mut feedback) = self.feedback.lock() else {
                return;
            };
            (
                feedback.clicked_map.take(),
                feedback.clicked_marker.take(),
                feedback.hover.take(),
            )
        };

        if let Some(idx) = clicked_marker {
            if let Some(marker) = self.overlay.markers.get(idx) {
                self.status.message = Some(format!(
                    "{} - {}",
                    marker.label,
                    marker.point.coord_label()
                ));
            }
        } else if let Some(point) = clicked_map {
            self.on_map_click(point);
        }

        if let Some(cursor) = hover {
            self.status.cursor = Some(cursor);
        }
    }

    /// Renders the status bar: message or cursor readout on the left,
    /// centre and zoom on the right.
    fn draw_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let left = match (&self.status.message, self.status.cursor) {
                (Some(message), _) => message.clone(),
                (None, Some(cursor)) => {
                    format!("Lat: {:.5}, Lon: {:.5}", cursor.lat, cursor.lon)
                }
                (None, None) => "Lat: ---, Lon: ---".to_string(),
            };
            ui.label(left);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let center = self.map_center();
                ui.label(format!("Center: {:.5}, {:.5}", center.lat, center.lon));
                ui.separator();
                ui.label(format!("Zoom: {:.0}", self.map_memory.zoom()));
            });
        });
    }
}
