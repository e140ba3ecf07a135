//! Core data types and structures for the map viewer.
//!
//! This module defines the fundamental data carried around the application:
//! geographic points, history records, the exclusive interaction mode, and
//! computed route plans.

use serde::{Deserialize, Serialize};

use crate::constants::COORD_TOLERANCE;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in [-90, 90].
    pub lat: f64,
    /// Longitude in [-180, 180].
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a new point from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether this point and `other` are the same place, within the
    /// per-axis coordinate tolerance used for history deduplication.
    pub fn approx_eq(&self, other: &GeoPoint) -> bool {
        (self.lat - other.lat).abs() < COORD_TOLERANCE
            && (self.lon - other.lon).abs() < COORD_TOLERANCE
    }

    /// Short `"lat, lon"` display string with five decimal places.
    pub fn coord_label(&self) -> String {
        format!("{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// A visited location persisted to the history file.
///
/// Serialized field names match the on-disk JSON format
/// `{label, address, lat, lon, ts}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// User-displayable short name for the location.
    pub label: String,
    /// Full address string (from geocoding, or the label for raw clicks).
    pub address: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Local timestamp of the visit, `%Y-%m-%d %H:%M:%S`.
    pub ts: String,
}

impl HistoryEntry {
    /// Creates an entry for `address` at the given position, stamped with
    /// the current local time.
    ///
    /// The label is derived from the first comma-delimited segment of the
    /// address; an empty address falls back to a coordinate string.
    pub fn new(address: &str, point: GeoPoint) -> Self {
        let label = if address.is_empty() {
            point.coord_label()
        } else {
            address.split(',').next().unwrap_or(address).trim().to_string()
        };
        let address = if address.is_empty() {
            label.clone()
        } else {
            address.to_string()
        };
        Self {
            label,
            address,
            lat: point.lat,
            lon: point.lon,
            ts: crate::history::timestamp(),
        }
    }

    /// The entry's position as a [`GeoPoint`].
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// The exclusive map interaction mode.
///
/// Exactly one variant is active at any time; transitions are performed
/// only by the explicit methods on
/// [`InteractionController`](crate::interaction::InteractionController).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Clicks drop markers and record history.
    #[default]
    Idle,
    /// Clicks append vertices to the polygon draft.
    DrawingPolygon,
    /// Clicks pick the route start and end points.
    PickingRoute,
}

/// Start and end points picked for routing.
///
/// A route is requested only once both points are set; `start` resets to
/// `None` after every computed route so the next click begins a new pick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteSelection {
    /// Picked route origin, if any.
    pub start: Option<GeoPoint>,
    /// Picked route destination, if any.
    pub end: Option<GeoPoint>,
}

impl RouteSelection {
    /// Clears both endpoints.
    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }
}

/// A computed driving route as returned by the routing service.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Path vertices in (lat, lon) order, ready for drawing.
    pub points: Vec<GeoPoint>,
    /// Total length in meters.
    pub distance_m: f64,
    /// Estimated travel time in seconds.
    pub duration_s: f64,
}

impl RoutePlan {
    /// Total length in kilometers.
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Estimated travel time in minutes.
    pub fn duration_min(&self) -> f64 {
        self.duration_s / 60.0
    }

    /// The vertex the camera focuses after drawing: index `len / 2`.
    ///
    /// Returns `None` for an empty path.
    pub fn midpoint(&self) -> Option<GeoPoint> {
        self.points.get(self.points.len() / 2).copied()
    }
}
