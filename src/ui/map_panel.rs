//! The central map panel: tile rendering, overlays, and click capture.
//!
//! The walkers `Map` widget handles tiles, panning, and zooming. An
//! [`OverlayPlugin`] instance is rebuilt each frame from the overlay
//! state; it projects and paints markers, the polygon preview, committed
//! polygons, and the route path, and reports clicks and cursor movement
//! back through the shared feedback mailbox.

use std::sync::{Arc, Mutex};

use eframe::egui;
use walkers::{HttpTiles, Map, MapMemory, Plugin, Position, Projector};

use super::state::{MapApp, Marker, OverlayFeedback};
use crate::constants::{DEFAULT_LAT, DEFAULT_LON};
use crate::tiles::{style_by_key, StyleTileSource};
use crate::types::GeoPoint;

/// Marker fill.
const MARKER_COLOR: egui::Color32 = egui::Color32::from_rgb(74, 144, 226);
/// Route start marker fill.
const ROUTE_START_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 153, 51);
/// Route end marker fill.
const ROUTE_END_COLOR: egui::Color32 = egui::Color32::from_rgb(204, 34, 34);
/// Polygon outline (preview and committed).
const POLYGON_STROKE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 153, 0);
/// Committed polygon fill.
const POLYGON_FILL_COLOR: egui::Color32 = egui::Color32::from_rgba_premultiplied(255, 208, 122, 140);
/// Route path stroke.
const ROUTE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 51, 51);
/// Clicks closer than this (in pixels) to a marker select the marker.
const MARKER_HIT_RADIUS: f32 = 12.0;

fn to_position(point: GeoPoint) -> Position {
    walkers::lat_lon(point.lat, point.lon)
}

fn to_geopoint(position: Position) -> GeoPoint {
    GeoPoint::new(position.y(), position.x())
}

impl MapApp {
    /// Lazily (re)creates the tile fetcher for the active style.
    pub fn ensure_tiles(&mut self, ctx: &egui::Context) {
        if self.tiles.is_none() {
            let source = StyleTileSource::new(style_by_key(&self.style_key));
            self.tiles = Some(HttpTiles::new(source, ctx.clone()));
        }
    }

    /// Switches the tile style. Position and zoom live in the map memory
    /// and are untouched; only the tile source is re-pointed.
    pub fn change_style(&mut self, key: &str) {
        if self.style_key != key {
            self.style_key = key.to_string();
            self.tiles = None;
        }
    }

    /// The current map centre.
    pub fn map_center(&self) -> GeoPoint {
        self.map_memory
            .detached()
            .map(to_geopoint)
            .unwrap_or(GeoPoint::new(DEFAULT_LAT, DEFAULT_LON))
    }

    /// Re-centres the map immediately.
    pub fn set_map_center(&mut self, point: GeoPoint) {
        self.map_memory.center_at(to_position(point));
    }

    /// Renders the map with the overlay plugin and paints attribution.
    pub fn draw_map(&mut self, ui: &mut egui::Ui) {
        self.ensure_tiles(ui.ctx());

        let style = style_by_key(&self.style_key);
        let map_rect = ui.available_rect_before_wrap();
        let plugin = OverlayPlugin {
            markers: self.overlay.markers.clone(),
            preview: self.overlay.preview.clone(),
            polygons: self.overlay.polygons.clone(),
            route: self
                .overlay
                .route
                .as_ref()
                .map(|plan| plan.points.clone())
                .unwrap_or_default(),
            route_start: self.overlay.route_start,
            route_end: self.overlay.route_end,
            feedback: Arc::clone(&self.feedback),
            map_rect,
        };

        let home = walkers::lat_lon(DEFAULT_LAT, DEFAULT_LON);
        if let Some(tiles) = &mut self.tiles {
            let map = Map::new(Some(tiles), &mut self.map_memory, home).with_plugin(plugin);
            ui.add(map);

            ui.painter().text(
                map_rect.max - egui::vec2(5.0, 5.0),
                egui::Align2::RIGHT_BOTTOM,
                format!("© {}", style.name),
                egui::FontId::proportional(10.0),
                egui::Color32::from_black_alpha(150),
            );
        }
    }
}

/// Per-frame plugin that paints the overlays and captures input.
pub struct OverlayPlugin {
    markers: Vec<Marker>,
    preview: Vec<GeoPoint>,
    polygons: Vec<Vec<GeoPoint>>,
    route: Vec<GeoPoint>,
    route_start: Option<GeoPoint>,
    route_end: Option<GeoPoint>,
    feedback: Arc<Mutex<OverlayFeedback>>,
    map_rect: egui::Rect,
}

impl OverlayPlugin {
    fn project(projector: &Projector, point: GeoPoint) -> egui::Pos2 {
        let v = projector.project(to_position(point));
        egui::pos2(v.x, v.y)
    }
}

impl Plugin for OverlayPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let painter = ui.painter().with_clip_rect(self.map_rect);

        // Committed polygons: filled with an outline.
        for polygon in &self.polygons {
            let points: Vec<egui::Pos2> = polygon
                .iter()
                .map(|&p| Self::project(projector, p))
                .collect();
            if points.len() >= 3 {
                painter.add(egui::Shape::convex_polygon(
                    points,
                    POLYGON_FILL_COLOR,
                    egui::Stroke::new(2.0, POLYGON_STROKE_COLOR),
                ));
            }
        }

        // In-progress polygon: outline only, needs two points to show.
        if self.preview.len() >= 2 {
            let points: Vec<egui::Pos2> = self
                .preview
                .iter()
                .map(|&p| Self::project(projector, p))
                .collect();
            painter.add(egui::Shape::closed_line(
                points,
                egui::Stroke::new(2.0, POLYGON_STROKE_COLOR),
            ));
        }

        // Route path.
        if self.route.len() >= 2 {
            let points: Vec<egui::Pos2> = self
                .route
                .iter()
                .map(|&p| Self::project(projector, p))
                .collect();
            painter.add(egui::Shape::line(
                points,
                egui::Stroke::new(3.0, ROUTE_COLOR),
            ));
        }

        // Route endpoints.
        for (point, color) in [
            (self.route_start, ROUTE_START_COLOR),
            (self.route_end, ROUTE_END_COLOR),
        ] {
            if let Some(p) = point {
                let pos = Self::project(projector, p);
                painter.circle_filled(pos, 7.0, color);
                painter.circle_stroke(pos, 7.0, egui::Stroke::new(1.5, egui::Color32::WHITE));
            }
        }

        // Markers, remembering screen positions for click hit-testing.
        let mut marker_screen: Vec<egui::Pos2> = Vec::with_capacity(self.markers.len());
        for marker in &self.markers {
            let pos = Self::project(projector, marker.point);
            painter.circle_filled(pos, 6.0, MARKER_COLOR);
            painter.circle_stroke(pos, 6.0, egui::Stroke::new(1.5, egui::Color32::WHITE));
            marker_screen.push(pos);
        }

        let Ok(mut feedback) = self.feedback.lock() else {
            return;
        };

        if response.clicked() {
            if let Some(click) = response.interact_pointer_pos() {
                let hit = marker_screen
                    .iter()
                    .enumerate()
                    .map(|(idx, pos)| (idx, pos.distance(click)))
                    .filter(|(_, d)| *d <= MARKER_HIT_RADIUS)
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                match hit {
                    Some((idx, _)) => feedback.clicked_marker = Some(idx),
                    None => {
                        feedback.clicked_map =
                            Some(to_geopoint(projector.unproject(click.to_vec2())));
                    }
                }
            }
        }

        if let Some(hover) = response.hover_pos() {
            feedback.hover = Some(to_geopoint(projector.unproject(hover.to_vec2())));
        }
    }
}
