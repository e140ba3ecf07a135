//! # Map Viewer
//!
//! An interactive desktop map viewer displaying tiled imagery with a
//! search box, markers, polygon drawing, and driving routes. Supports:
//! - **Search**: free-text place lookup via a geocoding service
//! - **Markers**: click the map to drop a labelled marker
//! - **Polygons**: draw an area point by point and commit it as a shape
//! - **Routing**: pick two points and draw the driving route between them
//!
//! ## Features
//! - Six switchable tile styles (street, terrain, satellite, ...)
//! - Smooth eased camera pans to search results and routes
//! - Persistent history of visited locations with jump-back
//! - Live cursor and map-centre coordinate readouts

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod camera;
mod constants;
mod history;
mod interaction;
mod services;
mod tiles;
mod types;
mod ui;

// Re-export public types and functions
pub use camera::*;
pub use history::*;
pub use interaction::*;
pub use services::*;
pub use tiles::*;
pub use types::*;
use ui::MapApp;

/// Runs the map viewer application with default settings.
///
/// This function initializes the egui application window and starts the
/// main event loop.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
///
/// # Example
///
/// ```no_run
/// use map_viewer::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> std::result::Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Map Viewer")
            .with_inner_size([1200.0, 750.0])
            .with_min_inner_size([950.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Map Viewer",
        options,
        Box::new(|cc| Ok(Box::new(MapApp::new(cc)))),
    )
}
