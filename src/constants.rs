//! Shared application-wide constants.
//! Centralizes tweakable values used across the map, services, and UI.

// Startup viewport
/// Initial map centre latitude (Tehran).
pub const DEFAULT_LAT: f64 = 35.6892;
/// Initial map centre longitude (Tehran).
pub const DEFAULT_LON: f64 = 51.3890;
/// Initial map zoom level.
pub const DEFAULT_ZOOM: f64 = 11.0;
/// Zoom level applied when focusing a search result or history entry.
pub const FOCUS_ZOOM: f64 = 14.0;

// Camera animation
/// Total duration of a smooth pan, in milliseconds.
pub const PAN_DURATION_MS: u64 = 400;
/// Number of interpolation steps per smooth pan.
pub const PAN_STEPS: u32 = 24;
/// Lower bound on the spacing between animation steps, in milliseconds.
pub const PAN_MIN_INTERVAL_MS: u64 = 10;

// History
/// File the location history is persisted to, relative to the working directory.
pub const HISTORY_FILE: &str = "history.json";
/// Two coordinates closer than this (in degrees, per axis) are the same place.
pub const COORD_TOLERANCE: f64 = 1e-7;

// Service clients
/// Geocoding request timeout, in seconds.
pub const GEOCODE_TIMEOUT_SECS: u64 = 8;
/// Routing request timeout, in seconds.
pub const ROUTE_TIMEOUT_SECS: u64 = 10;
/// User-Agent sent with geocoding requests (Nominatim requires one).
pub const GEOCODE_USER_AGENT: &str = "map-viewer (contact: example@example.com)";

// Search field error flash
/// Frames the search field stays tinted after a failed search.
pub const FLASH_FRAMES: u32 = 16;
