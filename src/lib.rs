//! Facade crate for the ride-share pooling engine.
//!
//! This crate re-exports the core domain types, the spatio-temporal
//! clusterer and the simulation pipeline, and exposes the genetic matcher
//! behind the `solver-ga` feature.

#![forbid(unsafe_code)]

pub use rideshare_core::{
    Assignment, Bounds, Cluster, ClusterParams, Clusterer, Coordinate, DataAdapter, GeoError,
    LogObserver, MatchConstraints, MatchDiagnostics, MatchOutcome, Matcher, NoopObserver,
    RideRequest, RoutingEngine, RoutingError, SearchEvent, SearchObserver, Vehicle, VehicleError,
    coordinate, haversine_km,
};

pub use rideshare_cluster::{ClustererConfig, EpsilonPolicy, SpatioTemporalClusterer};

pub use rideshare_sim::{
    Metrics, SimulationError, SimulationOrchestrator, SimulationParams, SimulationResult,
    StraightLineRouter, UniformDataAdapter, UniformDataAdapterConfig,
};

#[cfg(feature = "solver-ga")]
pub use rideshare_solver_ga::{FitnessWeights, GeneticMatcher, GeneticMatcherConfig};

#[cfg(feature = "test-support")]
pub use rideshare_core::test_support;
