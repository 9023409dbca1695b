//! Tests for the `SimulationOrchestrator`.
#![expect(
    clippy::float_arithmetic,
    clippy::expect_used,
    reason = "tests compare float metrics and use expect for readable failures"
)]

use rideshare_cluster::SpatioTemporalClusterer;
use rideshare_core::test_support::{FailingRouter, FixedDataAdapter, request_at, vehicle_at};
use rideshare_core::RoutingError;
use rideshare_solver_ga::GeneticMatcher;
use rstest::{fixture, rstest};

use super::*;
use crate::{StraightLineRouter, UniformDataAdapter};

const MINUTE_MS: u64 = 60_000;

#[fixture]
fn params() -> SimulationParams {
    SimulationParams::default()
}

fn downtown_pair() -> Vec<RideRequest> {
    vec![
        request_at(1, 40.7128, -74.0060, 9 * MINUTE_MS),
        request_at(2, 40.7129, -74.0061, 10 * MINUTE_MS),
    ]
}

#[rstest]
fn zero_vehicles_still_produce_clusters(params: SimulationParams) {
    let orchestrator = SimulationOrchestrator::new(
        FixedDataAdapter::default(),
        StraightLineRouter,
        SpatioTemporalClusterer::new(),
        GeneticMatcher::new(),
    );
    let result = orchestrator
        .run_with_inputs(downtown_pair(), Vec::new(), &params)
        .expect("routing never runs without assignments");
    assert_eq!(result.clusters.len(), 1);
    assert!(result.assignments.is_empty());
    assert_eq!(result.unassigned_requests.len(), 2);
    assert!(result.metrics.percentage_matched.abs() < f64::EPSILON);
}

#[rstest]
fn a_nearby_vehicle_serves_the_pair(params: SimulationParams) {
    let orchestrator = SimulationOrchestrator::new(
        FixedDataAdapter::default(),
        StraightLineRouter,
        SpatioTemporalClusterer::new(),
        GeneticMatcher::new(),
    );
    let vehicles = vec![vehicle_at(9, 40.7128, -74.0060, 4)];
    let result = orchestrator
        .run_with_inputs(downtown_pair(), vehicles, &params)
        .expect("straight-line routing succeeds");
    assert_eq!(result.assignments.len(), 1);
    assert!(result.unassigned_requests.is_empty());
    assert!((result.metrics.percentage_matched - 100.0).abs() < 1e-9);
    // Shared pickups and dropoffs: pooling saves the second passenger's trip.
    assert!(result.metrics.total_distance_saved_km > 0.0);
}

#[rstest]
fn stale_requests_are_reported_unassigned(params: SimulationParams) {
    let orchestrator = SimulationOrchestrator::new(
        FixedDataAdapter::default(),
        StraightLineRouter,
        SpatioTemporalClusterer::new(),
        GeneticMatcher::new(),
    );
    let mut requests = downtown_pair();
    requests.push(request_at(3, 40.7128, -74.0060, 200 * MINUTE_MS));
    let narrow = SimulationParams {
        now_ms: Some(10 * MINUTE_MS),
        time_window_minutes: 5.0,
        ..params
    };
    let vehicles = vec![vehicle_at(9, 40.7128, -74.0060, 4)];
    let result = orchestrator
        .run_with_inputs(requests, vehicles, &narrow)
        .expect("straight-line routing succeeds");
    let stale: Vec<u64> = result.unassigned_requests.iter().map(|r| r.id).collect();
    assert_eq!(stale, vec![3]);
    assert!((result.metrics.percentage_matched - 200.0 / 3.0).abs() < 1e-9);
}

#[rstest]
fn routing_failures_name_the_vehicle(params: SimulationParams) {
    let orchestrator = SimulationOrchestrator::new(
        FixedDataAdapter::default(),
        FailingRouter,
        SpatioTemporalClusterer::new(),
        GeneticMatcher::new(),
    );
    let vehicles = vec![vehicle_at(9, 40.7128, -74.0060, 4)];
    let err = orchestrator
        .run_with_inputs(downtown_pair(), vehicles, &params)
        .expect_err("failing router rejects every route");
    assert!(matches!(
        err,
        SimulationError::Routing {
            vehicle_id: 9,
            source: RoutingError::Unroutable { .. }
        }
    ));
}

#[rstest]
fn run_uses_the_data_adapter(params: SimulationParams) {
    let requests = downtown_pair();
    let vehicles = vec![vehicle_at(9, 40.7128, -74.0060, 4), vehicle_at(10, 40.75, -73.98, 4)];
    let orchestrator = SimulationOrchestrator::new(
        FixedDataAdapter::new(requests.clone(), vehicles),
        StraightLineRouter,
        SpatioTemporalClusterer::new(),
        GeneticMatcher::new(),
    );
    let single = SimulationParams {
        passenger_count: 2,
        vehicle_count: 1,
        ..params
    };
    let result = orchestrator.run(&single).expect("straight-line routing succeeds");
    assert_eq!(result.requests, requests);
    assert_eq!(result.vehicles.len(), 1);
}

#[rstest]
fn uniform_scenarios_are_reproducible(params: SimulationParams) {
    let orchestrator = SimulationOrchestrator::new(
        UniformDataAdapter::default(),
        StraightLineRouter,
        SpatioTemporalClusterer::new(),
        GeneticMatcher::new(),
    );
    let small = SimulationParams {
        passenger_count: 20,
        vehicle_count: 5,
        ..params
    };
    let first = orchestrator.run(&small).expect("straight-line routing succeeds");
    let second = orchestrator.run(&small).expect("straight-line routing succeeds");
    assert_eq!(first.assignments, second.assignments);
    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first.requests.len(), 20);
    assert!(first.metrics.percentage_matched >= 0.0 && first.metrics.percentage_matched <= 100.0);
}
