//! Deterministic collaborators for unit and behaviour tests.

use std::sync::{Mutex, PoisonError};

use crate::{
    Bounds, Cluster, Coordinate, DataAdapter, RideRequest, RoutingEngine, RoutingError,
    SearchEvent, SearchObserver, Vehicle, coordinate, haversine_km,
};

/// Build a request whose pickup is `(lat, lng)` and whose dropoff is a short
/// hop north-east of it.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "dropoff is offset from the pickup")]
pub fn request_at(id: u64, lat: f64, lng: f64, timestamp_ms: u64) -> RideRequest {
    RideRequest::new(
        id,
        coordinate(lat, lng),
        coordinate(lat + 0.01, lng + 0.01),
        timestamp_ms,
    )
}

/// Build a vehicle at `(lat, lng)` with `seats` free seats.
///
/// A zero `seats` value is bumped to one so the helper never fails.
#[must_use]
pub fn vehicle_at(id: u64, lat: f64, lng: f64, seats: u32) -> Vehicle {
    let capacity = seats.max(1);
    Vehicle {
        id,
        location: coordinate(lat, lng),
        capacity,
        available_seats: capacity,
        current_route: Vec::new(),
    }
}

/// A cluster of `size` requests picked up at `(lat, lng)`.
///
/// Request ids are `id * 1000 + k` for `k` in `0..size`, so clusters with
/// distinct ids never share requests. A zero `size` is bumped to one so the
/// cluster is never empty.
///
/// # Examples
/// ```
/// use rideshare_core::test_support::cluster_at;
///
/// let cluster = cluster_at(2, 40.7, -74.0, 3);
/// assert_eq!(cluster.request_ids().collect::<Vec<_>>(), vec![2000, 2001, 2002]);
/// ```
#[must_use]
pub fn cluster_at(id: u64, lat: f64, lng: f64, size: usize) -> Cluster {
    let requests = (0_u64..)
        .take(size.max(1))
        .map(|k| request_at(id * 1000 + k, lat, lng, 0))
        .collect();
    Cluster {
        id,
        centroid: coordinate(lat, lng),
        requests,
    }
}

/// `DataAdapter` that hands out pre-built requests and vehicles.
#[derive(Debug, Clone, Default)]
pub struct FixedDataAdapter {
    requests: Vec<RideRequest>,
    vehicles: Vec<Vehicle>,
}

impl FixedDataAdapter {
    /// Serve `requests` and `vehicles` in order, truncated to the asked count.
    #[must_use]
    pub const fn new(requests: Vec<RideRequest>, vehicles: Vec<Vehicle>) -> Self {
        Self { requests, vehicles }
    }
}

impl DataAdapter for FixedDataAdapter {
    fn generate_requests(&self, count: usize, _bounds: &Bounds) -> Vec<RideRequest> {
        self.requests.iter().take(count).cloned().collect()
    }

    fn generate_vehicles(&self, count: usize, _bounds: &Bounds) -> Vec<Vehicle> {
        self.vehicles.iter().take(count).cloned().collect()
    }
}

/// `RoutingEngine` that returns its waypoints unchanged and measures legs
/// with [`haversine_km`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoRouter;

impl RoutingEngine for EchoRouter {
    fn calculate_route(&self, points: &[Coordinate]) -> Result<Vec<Coordinate>, RoutingError> {
        if points.is_empty() {
            return Err(RoutingError::EmptyRoute);
        }
        Ok(points.to_vec())
    }

    fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        haversine_km(a, b)
    }
}

/// `RoutingEngine` whose routes always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingRouter;

impl RoutingEngine for FailingRouter {
    fn calculate_route(&self, _points: &[Coordinate]) -> Result<Vec<Coordinate>, RoutingError> {
        Err(RoutingError::Unroutable {
            reason: "test router refuses every route".to_owned(),
        })
    }

    fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        haversine_km(a, b)
    }
}

/// `SearchObserver` that stores every event it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SearchEvent>>,
}

impl RecordingObserver {
    /// Snapshot of the events seen so far.
    #[must_use]
    pub fn events(&self) -> Vec<SearchEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SearchObserver for RecordingObserver {
    fn on_event(&self, event: &SearchEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
