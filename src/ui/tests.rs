use super::state::Marker;
use super::*;
use crate::history::HistoryStore;
use crate::interaction::MapEffect;
use crate::types::{GeoPoint, InteractionMode};
use eframe::egui;

/// Run a single headless egui frame with the provided input events and closure.
fn run_ui_with(events: Vec<egui::Event>, mut f: impl FnMut(&egui::Context)) -> egui::FullOutput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 750.0),
    ));
    raw.events = events;

    let ctx = egui::Context::default();
    // The helper documents itself as a single frame; egui defaults to
    // running up to two passes (a measurement pass for Grid/ScrollArea on a
    // fresh context), so pin it to one pass to match that contract.
    ctx.options_mut(|o| o.max_passes = std::num::NonZeroUsize::new(1).unwrap());
    ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        f(ctx);
    })
}

/// App with its history redirected to a temp file so tests never touch
/// the real working directory.
fn test_app() -> (tempfile::TempDir, MapApp) {
    let dir = tempfile::tempdir().unwrap();
    let mut app = MapApp::default();
    app.history = HistoryStore::load(dir.path().join("history.json"));
    (dir, app)
}

#[test]
fn empty_search_flashes_and_leaves_history_alone() {
    let (_dir, mut app) = test_app();

    app.search.query = "   ".into();
    app.submit_search();

    assert!(app.search.error_flash > 0);
    assert!(app.history.is_empty());
    assert!(app.overlay.markers.is_empty());
}

#[test]
fn search_without_geocoder_flashes() {
    let (_dir, mut app) = test_app();
    app.geocoder = None;

    app.search.query = "Tehran".into();
    app.submit_search();

    assert!(app.search.error_flash > 0);
    assert_eq!(app.search.query, "Tehran", "query is kept for a retry");
}

#[test]
fn idle_map_click_adds_history_and_marker() {
    let (_dir, mut app) = test_app();

    if let Ok(mut feedback) = app.feedback.lock() {
        feedback.clicked_map = Some(GeoPoint::new(35.6892, 51.389));
    }
    app.handle_map_feedback();

    assert_eq!(app.history.len(), 1);
    assert_eq!(app.overlay.markers.len(), 1);
    assert_eq!(app.overlay.markers[0].label, "35.68920, 51.38900");
}

#[test]
fn clicking_a_marker_shows_info_instead_of_dropping_a_new_one() {
    let (_dir, mut app) = test_app();
    app.overlay.markers.push(Marker {
        point: GeoPoint::new(1.0, 2.0),
        label: "Somewhere".into(),
    });

    if let Ok(mut feedback) = app.feedback.lock() {
        feedback.clicked_marker = Some(0);
    }
    app.handle_map_feedback();

    assert_eq!(app.overlay.markers.len(), 1);
    assert!(app.history.is_empty());
    let message = app.status.message.expect("marker info should be shown");
    assert!(message.contains("Somewhere"));
}

#[test]
fn hovering_updates_the_cursor_readout() {
    let (_dir, mut app) = test_app();

    if let Ok(mut feedback) = app.feedback.lock() {
        feedback.hover = Some(GeoPoint::new(10.0, 20.0));
    }
    app.handle_map_feedback();

    assert_eq!(app.status.cursor, Some(GeoPoint::new(10.0, 20.0)));
}

#[test]
fn mode_toggles_stay_exclusive() {
    let (_dir, mut app) = test_app();

    app.toggle_polygon_mode();
    assert_eq!(app.controller.mode(), InteractionMode::DrawingPolygon);

    app.toggle_routing_mode();
    assert_eq!(app.controller.mode(), InteractionMode::PickingRoute);

    // Toggling the active mode again turns it off.
    app.toggle_routing_mode();
    assert_eq!(app.controller.mode(), InteractionMode::Idle);
    assert_eq!(app.status.message, None);
}

#[test]
fn focus_effect_starts_the_camera_animation() {
    let (_dir, mut app) = test_app();

    app.apply_effects(vec![MapEffect::FocusCamera {
        point: GeoPoint::new(35.0, 51.0),
    }]);

    assert!(app.animator.is_animating());
}

#[test]
fn committing_a_polygon_replaces_the_preview() {
    let (_dir, mut app) = test_app();
    app.toggle_polygon_mode();

    for point in [
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 1.0),
        GeoPoint::new(1.0, 1.0),
    ] {
        app.on_map_click(point);
    }
    assert_eq!(app.overlay.preview.len(), 3);

    let effects = app.controller.finish_polygon();
    app.apply_effects(effects);

    assert!(app.overlay.preview.is_empty());
    assert_eq!(app.overlay.polygons.len(), 1);
    assert_eq!(app.overlay.polygons[0].len(), 3);
    assert_eq!(app.controller.mode(), InteractionMode::Idle);
}

#[test]
fn clear_all_resets_overlays_history_and_modes() {
    let (_dir, mut app) = test_app();

    app.on_map_click(GeoPoint::new(1.0, 1.0));
    app.toggle_polygon_mode();
    app.on_map_click(GeoPoint::new(2.0, 2.0));
    app.overlay.route_start = Some(GeoPoint::new(3.0, 3.0));

    app.clear_all();

    assert!(app.overlay.markers.is_empty());
    assert!(app.overlay.preview.is_empty());
    assert!(app.overlay.polygons.is_empty());
    assert_eq!(app.overlay.route_start, None);
    assert!(app.history.is_empty());
    assert_eq!(app.status.message, None);
}

#[test]
fn history_jump_drops_marker_and_pans() {
    let (_dir, mut app) = test_app();
    app.on_map_click(GeoPoint::new(35.6892, 51.389));
    app.overlay.markers.clear();

    app.jump_to_history_entry(0);

    assert_eq!(app.overlay.markers.len(), 1);
    assert!(app.animator.is_animating());
}

#[test]
fn changing_style_drops_tiles_but_keeps_view_state() {
    let (_dir, mut app) = test_app();
    assert_eq!(app.style_key, "map");

    app.change_style("dark");

    assert_eq!(app.style_key, "dark");
    assert!(app.tiles.is_none(), "tiles are rebuilt for the new style");
}

#[test]
fn side_panel_renders_headlessly() {
    let (_dir, mut app) = test_app();
    app.on_map_click(GeoPoint::new(1.0, 1.0));

    run_ui_with(Vec::new(), |ctx| {
        egui::SidePanel::right("side_panel").show(ctx, |ui| {
            app.draw_side_panel(ui);
        });
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            app.draw_status_bar(ui);
        });
    });

    // One frame with a failed search keeps the flash fading.
    app.search.query.clear();
    app.submit_search();
    let flash_before = app.search.error_flash;
    run_ui_with(Vec::new(), |ctx| {
        egui::SidePanel::right("side_panel").show(ctx, |ui| {
            app.draw_side_panel(ui);
        });
    });
    assert_eq!(app.search.error_flash, flash_before - 1);
}

#[test]
fn preferences_round_trip_through_json() {
    let (_dir, mut app) = test_app();
    app.change_style("satellite");

    let json = app.to_json().unwrap();
    let restored = MapApp::from_json(&json).unwrap();

    assert_eq!(restored.style_key, "satellite");
    assert_eq!(restored.controller.mode(), InteractionMode::Idle);
}
