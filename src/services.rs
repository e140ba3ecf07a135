//! Thin blocking clients for the external geocoding and routing services.
//!
//! Both clients are stateless request/response wrappers. Calls block the
//! UI callback that issued them, bounded by the per-client timeout; every
//! failure class (transport error, bad status, empty result, unparsable
//! body) surfaces as a [`ServiceError`] that the UI degrades to a visual
//! cue. Response parsing is split from transport so the wire contract can
//! be tested without a network.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{GEOCODE_TIMEOUT_SECS, GEOCODE_USER_AGENT, ROUTE_TIMEOUT_SECS};
use crate::types::{GeoPoint, RoutePlan};

/// Base URL of the geocoding service (Nominatim search API).
const GEOCODE_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
/// Base URL of the routing service (OSRM driving profile).
const ROUTE_ENDPOINT: &str = "https://router.project-osrm.org";

/// Errors produced by the service clients.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Transport-level failure (connection, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The body did not match the expected wire format.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The service answered cleanly but found nothing.
    #[error("no results")]
    NoResults,
}

/// Result alias for service calls.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// A geocoded location: resolved position plus its display address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Resolved position.
    pub point: GeoPoint,
    /// Full display address returned by the service.
    pub address: String,
}

/// One hit in a Nominatim search response. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
    display_name: String,
}

/// Parses a Nominatim search response body into the best hit.
pub fn parse_geocode_response(body: &str) -> Result<GeocodedPlace> {
    let hits: Vec<GeocodeHit> =
        serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))?;
    let hit = hits.into_iter().next().ok_or(ServiceError::NoResults)?;
    let lat: f64 = hit
        .lat
        .parse()
        .map_err(|_| ServiceError::Malformed(format!("bad latitude {:?}", hit.lat)))?;
    let lon: f64 = hit
        .lon
        .parse()
        .map_err(|_| ServiceError::Malformed(format!("bad longitude {:?}", hit.lon)))?;
    Ok(GeocodedPlace {
        point: GeoPoint::new(lat, lon),
        address: hit.display_name,
    })
}

/// Client for the free-text location search endpoint.
pub struct GeocodeClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl GeocodeClient {
    /// Creates a client with the service timeout and User-Agent applied.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(GEOCODE_TIMEOUT_SECS))
            .user_agent(GEOCODE_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: GEOCODE_ENDPOINT.to_string(),
        })
    }

    /// Resolves free text to a location. Blocks the caller for at most the
    /// client timeout; every non-success outcome is an error.
    pub fn search(&self, query: &str) -> Result<GeocodedPlace> {
        let url = format!("{}/search", self.endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }
        parse_geocode_response(&response.text()?)
    }
}

/// OSRM route response envelope.
#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON positions: (lon, lat) pairs that must be swapped for drawing.
    coordinates: Vec<[f64; 2]>,
}

/// Parses an OSRM route response body into a [`RoutePlan`].
pub fn parse_route_response(body: &str) -> Result<RoutePlan> {
    let response: OsrmResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))?;
    let route = response.routes.into_iter().next().ok_or(ServiceError::NoResults)?;
    let points = route
        .geometry
        .coordinates
        .iter()
        .map(|&[lon, lat]| GeoPoint::new(lat, lon))
        .collect();
    Ok(RoutePlan {
        points,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}

/// Client for the driving-route endpoint.
pub struct RoutingClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl RoutingClient {
    /// Creates a client with the routing timeout applied.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(ROUTE_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: ROUTE_ENDPOINT.to_string(),
        })
    }

    /// Computes a driving route between two points. Blocks the caller for
    /// at most the client timeout; any non-success outcome is an error.
    pub fn route(&self, start: GeoPoint, end: GeoPoint) -> Result<RoutePlan> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.endpoint, start.lon, start.lat, end.lon, end.lat
        );
        let response = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }
        parse_route_response(&response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocode_parses_first_hit_with_string_coordinates() {
        let body = r#"[
            {"lat": "35.6997", "lon": "51.3381", "display_name": "Azadi Tower, Tehran, Iran"},
            {"lat": "0", "lon": "0", "display_name": "ignored"}
        ]"#;
        let place = parse_geocode_response(body).unwrap();
        assert_eq!(place.point, GeoPoint::new(35.6997, 51.3381));
        assert_eq!(place.address, "Azadi Tower, Tehran, Iran");
    }

    #[test]
    fn geocode_empty_array_is_no_results() {
        assert!(matches!(
            parse_geocode_response("[]"),
            Err(ServiceError::NoResults)
        ));
    }

    #[test]
    fn geocode_unparsable_coordinate_is_malformed() {
        let body = r#"[{"lat": "north", "lon": "51.3", "display_name": "x"}]"#;
        assert!(matches!(
            parse_geocode_response(body),
            Err(ServiceError::Malformed(_))
        ));
    }

    #[test]
    fn geocode_garbage_body_is_malformed() {
        assert!(matches!(
            parse_geocode_response("<html>"),
            Err(ServiceError::Malformed(_))
        ));
    }

    #[test]
    fn route_swaps_coordinates_and_carries_totals() {
        let body = r#"{
            "routes": [{
                "geometry": {"coordinates": [[51.40, 35.70], [51.41, 35.69], [51.42, 35.68]]},
                "distance": 1500.0,
                "duration": 120.0
            }]
        }"#;
        let plan = parse_route_response(body).unwrap();
        assert_eq!(
            plan.points,
            vec![
                GeoPoint::new(35.70, 51.40),
                GeoPoint::new(35.69, 51.41),
                GeoPoint::new(35.68, 51.42),
            ]
        );
        assert_eq!(plan.distance_km(), 1.5);
        assert_eq!(plan.duration_min(), 2.0);
        assert_eq!(plan.midpoint(), Some(GeoPoint::new(35.69, 51.41)));
    }

    #[test]
    fn route_empty_routes_array_is_no_results() {
        assert!(matches!(
            parse_route_response(r#"{"routes": []}"#),
            Err(ServiceError::NoResults)
        ));
        assert!(matches!(
            parse_route_response(r#"{"code": "NoRoute"}"#),
            Err(ServiceError::NoResults)
        ));
    }

    #[test]
    fn route_missing_totals_default_to_zero() {
        let body = r#"{"routes": [{"geometry": {"coordinates": [[1.0, 2.0]]}}]}"#;
        let plan = parse_route_response(body).unwrap();
        assert_eq!(plan.distance_m, 0.0);
        assert_eq!(plan.duration_s, 0.0);
        assert_eq!(plan.points, vec![GeoPoint::new(2.0, 1.0)]);
    }
}
