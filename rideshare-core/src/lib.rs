//! Core domain types for the ride-share pooling engine.
//!
//! The crate holds the vocabulary shared by every other member of the
//! workspace:
//!
//! - **Geometry**: haversine distance, centroids and path lengths over
//!   [`Coordinate`] values.
//! - **Domain model**: [`RideRequest`], [`Vehicle`], [`Cluster`] and
//!   [`Assignment`].
//! - **Collaborator traits**: [`Clusterer`], [`Matcher`], [`RoutingEngine`]
//!   and [`DataAdapter`], which let the orchestrator stay generic over the
//!   algorithms and the outside world.
//! - **Observability**: the [`SearchObserver`] sink through which the
//!   algorithms report progress without holding global state.
//!
//! Coordinates follow the `geo` convention: `x` is longitude and `y` is
//! latitude, both in degrees.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assignment;
pub mod cluster;
pub mod data;
pub mod geometry;
pub mod observer;
pub mod request;
pub mod routing;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
pub mod vehicle;

pub use assignment::{Assignment, MatchConstraints, MatchDiagnostics, MatchOutcome, Matcher};
pub use cluster::{Cluster, ClusterParams, Clusterer};
pub use data::{Bounds, DataAdapter};
pub use geometry::{
    Coordinate, EARTH_RADIUS_KM, GeoError, centroid, coordinate, haversine_km, path_length_km,
};
pub use observer::{LogObserver, NoopObserver, SearchEvent, SearchObserver};
pub use request::{RideRequest, minutes_between};
pub use routing::{RoutingEngine, RoutingError};
pub use vehicle::{Vehicle, VehicleError};
