//! Application state management structures.
//!
//! This module contains the state the UI shell works with: the main
//! [`MapApp`] struct, grouped sub-state for the search field, the map
//! overlays, and the status bar, plus the shared mailbox the map overlay
//! plugin reports clicks through.
//!
//! Only UI preferences (the tile style key) are persisted between runs;
//! everything else is rebuilt on startup. The location history has its
//! own file, owned by [`HistoryStore`].

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::camera::CameraAnimator;
use crate::constants::HISTORY_FILE;
use crate::history::HistoryStore;
use crate::interaction::InteractionController;
use crate::services::{GeocodeClient, RoutingClient};
use crate::types::{GeoPoint, RoutePlan};

/// A labelled marker drawn on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Marker position.
    pub point: GeoPoint,
    /// Text shown in the status bar when the marker is clicked.
    pub label: String,
}

/// State of the search input field.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Current contents of the field.
    pub query: String,
    /// Frames remaining of the red error flash; zero when calm.
    pub error_flash: u32,
}

/// Everything currently drawn on top of the map tiles.
#[derive(Debug, Default)]
pub struct OverlayState {
    /// Dropped markers (from clicks, searches, and history jumps).
    pub markers: Vec<Marker>,
    /// In-progress polygon outline; drawn once it has two points.
    pub preview: Vec<GeoPoint>,
    /// Committed, filled polygons.
    pub polygons: Vec<Vec<GeoPoint>>,
    /// The committed route path, if one has been computed.
    pub route: Option<RoutePlan>,
    /// Route start marker position.
    pub route_start: Option<GeoPoint>,
    /// Route end marker position.
    pub route_end: Option<GeoPoint>,
}

/// State backing the status bar.
#[derive(Debug, Default)]
pub struct StatusState {
    /// Transient message (mode prompts, route summaries, errors).
    pub message: Option<String>,
    /// Last cursor position over the map, if any.
    pub cursor: Option<GeoPoint>,
}

/// Click and hover feedback reported by the map overlay plugin.
///
/// The plugin runs inside the walkers map widget during the frame; this
/// mailbox carries its observations back to the app, which drains it
/// right after the map is drawn. Everything stays on the UI thread; the
/// mutex only satisfies the plugin's ownership requirements.
#[derive(Debug, Default)]
pub struct OverlayFeedback {
    /// Map click position (not on a marker).
    pub clicked_map: Option<GeoPoint>,
    /// Index of a clicked marker in [`OverlayState::markers`].
    pub clicked_marker: Option<usize>,
    /// Cursor position while hovering the map.
    pub hover: Option<GeoPoint>,
}

fn default_history() -> HistoryStore {
    HistoryStore::load(HISTORY_FILE)
}

fn default_geocoder() -> Option<GeocodeClient> {
    GeocodeClient::new().ok()
}

fn default_router() -> Option<RoutingClient> {
    RoutingClient::new().ok()
}

/// The main application structure containing UI state and collaborators.
///
/// This struct implements the `eframe::App` trait and wires the
/// interaction controller, camera animator, history store, and service
/// clients to the egui panels and the walkers map widget.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct MapApp {
    /// Key of the active tile style (persisted preference).
    pub style_key: String,
    /// Search field state.
    #[serde(skip)]
    pub search: SearchState,
    /// Markers, polygons, and routes drawn over the tiles.
    #[serde(skip)]
    pub overlay: OverlayState,
    /// Status bar state.
    #[serde(skip)]
    pub status: StatusState,
    /// The exclusive interaction mode state machine.
    #[serde(skip)]
    pub controller: InteractionController,
    /// The single cancellable camera animation handle.
    #[serde(skip)]
    pub animator: CameraAnimator,
    /// Persisted location history.
    #[serde(skip, default = "default_history")]
    pub history: HistoryStore,
    /// Geocoding client; `None` if construction failed at startup.
    #[serde(skip, default = "default_geocoder")]
    pub geocoder: Option<GeocodeClient>,
    /// Routing client; `None` if construction failed at startup.
    #[serde(skip, default = "default_router")]
    pub router: Option<RoutingClient>,
    /// Tile fetcher for the active style; rebuilt on style switches.
    #[serde(skip)]
    pub tiles: Option<walkers::HttpTiles>,
    /// Walkers map state: centre, zoom, interaction.
    #[serde(skip)]
    pub map_memory: walkers::MapMemory,
    /// Mailbox filled by the overlay plugin during map drawing.
    #[serde(skip)]
    pub feedback: Arc<Mutex<OverlayFeedback>>,
    /// Whether the startup zoom has been applied this session.
    #[serde(skip)]
    pub applied_initial_view: bool,
}

impl Default for MapApp {
    fn default() -> Self {
        Self {
            style_key: "map".to_string(),
            search: SearchState::default(),
            overlay: OverlayState::default(),
            status: StatusState::default(),
            controller: InteractionController::new(),
            animator: CameraAnimator::new(),
            history: default_history(),
            geocoder: default_geocoder(),
            router: default_router(),
            tiles: None,
            map_memory: walkers::MapMemory::default(),
            feedback: Arc::default(),
            applied_initial_view: false,
        }
    }
}

impl MapApp {
    /// Creates the app, restoring persisted UI preferences if available.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.storage
            .and_then(|storage| storage.get_string("app_state"))
            .and_then(|json| Self::from_json(&json).ok())
            .unwrap_or_default()
    }

    /// Serializes the persisted preferences to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes persisted preferences from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
