//! Interaction mode controller.
//!
//! The controller owns the exclusive interaction mode together with its
//! transient per-mode state (the polygon draft and the route pick), and
//! turns map clicks and mode commands into a list of [`MapEffect`]s for
//! the UI shell to execute. It knows nothing about egui or walkers, so
//! every transition is testable headlessly.
//!
//! Mode exclusivity is enforced structurally: each `enter_*` transition
//! force-exits the other mode before activating its own, so at most one
//! of {DrawingPolygon, PickingRoute} is ever active.

use crate::services::{self, ServiceError};
use crate::types::{GeoPoint, InteractionMode, RoutePlan, RouteSelection};

/// Something the UI shell must do in response to a controller transition.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEffect {
    /// Record a visited location (raw map click; label derives from the
    /// coordinates).
    AddHistory { point: GeoPoint },
    /// Place a labelled marker.
    PlaceMarker { point: GeoPoint, label: String },
    /// Redraw the in-progress polygon outline (drawn once ≥2 points exist).
    PolygonPreview { points: Vec<GeoPoint> },
    /// Remove the in-progress polygon outline.
    ClearPolygonPreview,
    /// Materialize the draft into a closed, filled shape.
    CommitPolygon { points: Vec<GeoPoint> },
    /// Place the route start marker, replacing any previous one.
    RouteStartMarker { point: GeoPoint },
    /// Place the route end marker, replacing any previous one.
    RouteEndMarker { point: GeoPoint },
    /// Draw a computed route path, replacing any previous one.
    DrawRoute { plan: RoutePlan },
    /// Smoothly pan the camera to a point.
    FocusCamera { point: GeoPoint },
    /// Show a transient message in the status bar.
    Status(String),
}

/// Source of computed routes; implemented by the real routing client and
/// by test stubs.
pub trait RouteProvider {
    /// Computes a driving route between two points.
    fn route(&self, start: GeoPoint, end: GeoPoint) -> services::Result<RoutePlan>;
}

impl RouteProvider for crate::services::RoutingClient {
    fn route(&self, start: GeoPoint, end: GeoPoint) -> services::Result<RoutePlan> {
        crate::services::RoutingClient::route(self, start, end)
    }
}

/// The interaction state machine: current mode plus per-mode drafts.
#[derive(Debug, Default)]
pub struct InteractionController {
    mode: InteractionMode,
    draft: Vec<GeoPoint>,
    route: RouteSelection,
}

impl InteractionController {
    /// Creates a controller in the idle mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active mode.
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// The in-progress polygon vertices.
    pub fn draft(&self) -> &[GeoPoint] {
        &self.draft
    }

    /// The in-progress route pick.
    pub fn route_selection(&self) -> RouteSelection {
        self.route
    }

    /// Activates polygon drawing, force-exiting route picking first.
    pub fn enter_polygon_mode(&mut self) -> Vec<MapEffect> {
        if self.mode == InteractionMode::PickingRoute {
            // Drops the half-finished pick; committed routes stay drawn.
            self.route.clear();
        }
        self.mode = InteractionMode::DrawingPolygon;
        self.draft.clear();
        vec![MapEffect::Status(
            "Polygon mode: click to add points, Finish/Cancel to complete.".into(),
        )]
    }

    /// Activates route picking, force-exiting polygon drawing first.
    pub fn enter_route_mode(&mut self) -> Vec<MapEffect> {
        let mut effects = Vec::new();
        if self.mode == InteractionMode::DrawingPolygon {
            // The draft is discarded without committing.
            self.draft.clear();
            effects.push(MapEffect::ClearPolygonPreview);
        }
        self.mode = InteractionMode::PickingRoute;
        self.route.clear();
        effects.push(MapEffect::Status(
            "Routing mode: click the start point, then the destination.".into(),
        ));
        effects
    }

    /// Leaves the active mode, dropping its transient state.
    pub fn exit_to_idle(&mut self) -> Vec<MapEffect> {
        let mut effects = Vec::new();
        match self.mode {
            InteractionMode::DrawingPolygon => {
                self.draft.clear();
                effects.push(MapEffect::ClearPolygonPreview);
            }
            InteractionMode::PickingRoute => self.route.clear(),
            InteractionMode::Idle => {}
        }
        self.mode = InteractionMode::Idle;
        effects
    }

    /// Dispatches a map click according to the active mode.
    ///
    /// In route-picking mode the second click invokes `router` and blocks
    /// until it answers; afterwards the pick resets so the next click
    /// starts a fresh route, while any committed route stays drawn.
    pub fn handle_click(&mut self, point: GeoPoint, router: &dyn RouteProvider) -> Vec<MapEffect> {
        match self.mode {
            InteractionMode::Idle => vec![
                MapEffect::AddHistory { point },
                MapEffect::PlaceMarker {
                    point,
                    label: point.coord_label(),
                },
            ],
            InteractionMode::DrawingPolygon => {
                self.draft.push(point);
                vec![
                    MapEffect::PolygonPreview {
                        points: self.draft.clone(),
                    },
                    MapEffect::Status(format!("Polygon points: {}", self.draft.len())),
                ]
            }
            InteractionMode::PickingRoute => self.handle_route_click(point, router),
        }
    }

    fn handle_route_click(&mut self, point: GeoPoint, router: &dyn RouteProvider) -> Vec<MapEffect> {
        let Some(start) = self.route.start else {
            self.route.start = Some(point);
            return vec![
                MapEffect::RouteStartMarker { point },
                MapEffect::Status("Start picked. Click the destination.".into()),
            ];
        };

        self.route.end = Some(point);
        let mut effects = vec![MapEffect::RouteEndMarker { point }];

        match router.route(start, point) {
            Ok(plan) => {
                effects.push(MapEffect::Status(format!(
                    "Route drawn - distance: {:.2} km, time: {:.1} min",
                    plan.distance_km(),
                    plan.duration_min()
                )));
                if let Some(mid) = plan.midpoint() {
                    effects.push(MapEffect::FocusCamera { point: mid });
                }
                effects.push(MapEffect::DrawRoute { plan });
            }
            Err(err) => {
                effects.push(MapEffect::Status(route_error_message(&err)));
            }
        }

        // Ready for a new pick either way.
        self.route.clear();
        effects
    }

    /// Materializes the draft into a filled shape and returns to idle.
    /// With fewer than three points nothing changes except a status cue.
    pub fn finish_polygon(&mut self) -> Vec<MapEffect> {
        if self.mode == InteractionMode::DrawingPolygon && self.draft.len() >= 3 {
            let points = std::mem::take(&mut self.draft);
            self.mode = InteractionMode::Idle;
            vec![
                MapEffect::Status(format!("Polygon completed with {} points.", points.len())),
                MapEffect::CommitPolygon { points },
            ]
        } else {
            vec![MapEffect::Status(
                "Polygon needs at least 3 points to finish.".into(),
            )]
        }
    }

    /// Discards the draft and its preview and returns to idle, regardless
    /// of how many points were placed.
    pub fn cancel_polygon(&mut self) -> Vec<MapEffect> {
        self.draft.clear();
        if self.mode == InteractionMode::DrawingPolygon {
            self.mode = InteractionMode::Idle;
        }
        vec![MapEffect::ClearPolygonPreview]
    }

    /// Forgets the in-progress route pick (the UI clears the drawn path
    /// and markers itself).
    pub fn clear_route_selection(&mut self) {
        self.route.clear();
    }
}

fn route_error_message(err: &ServiceError) -> String {
    match err {
        ServiceError::NoResults => "No route found between those points.".into(),
        _ => "Failed to fetch the route.".into(),
    }
}
