//! Tests for the `GeneticMatcher`.
#![expect(
    clippy::float_arithmetic,
    reason = "tests offset coordinates and compare ratios"
)]

use std::collections::{HashMap, HashSet};

use rideshare_core::test_support::{RecordingObserver, cluster_at, vehicle_at};
use rstest::{fixture, rstest};

use super::*;

/// Roughly one kilometre of latitude.
const KM_LAT: f64 = 0.009;

#[fixture]
fn constraints() -> MatchConstraints {
    MatchConstraints { max_detour_km: 5.0 }
}

fn small_config() -> GeneticMatcherConfig {
    GeneticMatcherConfig {
        population_size: 16,
        max_generations: 30,
        stagnation_limit: 8,
        ..GeneticMatcherConfig::default()
    }
}

fn city() -> (Vec<Cluster>, Vec<Vehicle>) {
    let clusters = (0..8_u64)
        .map(|id| {
            let step = f64::from(u32::try_from(id).unwrap_or(0));
            cluster_at(id, 40.70 + step * KM_LAT, -74.00, 1 + usize::try_from(id % 3).unwrap_or(0))
        })
        .collect();
    let vehicles = (0..4_u64)
        .map(|id| {
            let step = f64::from(u32::try_from(id).unwrap_or(0));
            vehicle_at(id, 40.70 + 2.0 * step * KM_LAT, -74.00, 3)
        })
        .collect();
    (clusters, vehicles)
}

fn ratio(outcome: &MatchOutcome, clusters: &[Cluster]) -> f64 {
    let total: usize = clusters.iter().map(Cluster::size).sum();
    let served: usize = outcome.assignments.iter().map(Assignment::passenger_count).sum();
    count_f64(served) / count_f64(total)
}

#[rstest]
fn no_clusters_means_no_assignments(constraints: MatchConstraints) {
    let vehicles = vec![vehicle_at(0, 40.70, -74.00, 4)];
    let outcome = GeneticMatcher::new().assign(&[], &vehicles, &constraints);
    assert!(outcome.assignments.is_empty());
    assert!(outcome.unassigned_request_ids.is_empty());
}

#[rstest]
fn no_vehicles_leaves_every_request_unassigned(constraints: MatchConstraints) {
    let clusters = vec![cluster_at(0, 40.70, -74.00, 2), cluster_at(1, 40.71, -74.00, 1)];
    let outcome = GeneticMatcher::new().assign(&clusters, &[], &constraints);
    assert!(outcome.assignments.is_empty());
    assert_eq!(outcome.unassigned_request_ids, vec![0, 1, 1000]);
}

#[rstest]
fn an_ample_vehicle_on_the_spot_serves_everyone(constraints: MatchConstraints) {
    let clusters = vec![cluster_at(0, 40.70, -74.00, 3)];
    let vehicles = vec![vehicle_at(5, 40.70, -74.00, 4)];
    let outcome = GeneticMatcher::new().assign(&clusters, &vehicles, &constraints);
    assert_eq!(outcome.assignments.len(), 1);
    let assignment = outcome.assignments.first().expect("one assignment");
    assert_eq!(assignment.vehicle_id, 5);
    assert_eq!(assignment.cluster_ids, vec![0]);
    assert_eq!(assignment.request_ids, vec![0, 1, 2]);
    assert_eq!(assignment.route.len(), 7);
    assert!((assignment.relaxation_factor - 1.0).abs() < f64::EPSILON);
    assert!(outcome.unassigned_request_ids.is_empty());
    assert!((ratio(&outcome, &clusters) - 1.0).abs() < f64::EPSILON);
}

#[rstest]
fn capacity_limits_a_vehicle_to_one_pair(constraints: MatchConstraints) {
    let clusters = vec![cluster_at(0, 40.70, -74.00, 2), cluster_at(1, 40.70, -74.00, 2)];
    let vehicles = vec![vehicle_at(0, 40.70, -74.00, 2)];
    let outcome = GeneticMatcher::new().assign(&clusters, &vehicles, &constraints);
    assert_eq!(outcome.assignments.len(), 1);
    assert_eq!(outcome.unassigned_request_ids.len(), 2);
    assert!((ratio(&outcome, &clusters) - 0.5).abs() < f64::EPSILON);
    let last = outcome.diagnostics.assignment_ratio_history.last().copied();
    assert_eq!(last, Some(0.5));
}

#[rstest]
fn equal_seeds_give_equal_outcomes(constraints: MatchConstraints) {
    let (clusters, vehicles) = city();
    let matcher = GeneticMatcher::with_config(small_config());
    let first = matcher.assign(&clusters, &vehicles, &constraints);
    let second = matcher.assign(&clusters, &vehicles, &constraints);
    assert_eq!(first.assignments, second.assignments);
    assert_eq!(first.unassigned_request_ids, second.unassigned_request_ids);
    assert_eq!(
        first.diagnostics.best_fitness_history,
        second.diagnostics.best_fitness_history
    );
}

#[rstest]
fn incumbent_history_never_regresses(constraints: MatchConstraints) {
    let (clusters, vehicles) = city();
    let outcome =
        GeneticMatcher::with_config(small_config()).assign(&clusters, &vehicles, &constraints);
    let diagnostics = &outcome.diagnostics;
    assert_eq!(
        diagnostics.best_fitness_history.len(),
        diagnostics.generations_run + 1
    );
    for pair in diagnostics.assignment_ratio_history.windows(2) {
        if let [before, after] = pair {
            assert!(after >= before);
        }
    }
    for pair in diagnostics.best_fitness_history.windows(2) {
        if let [before, after] = pair {
            assert!(after >= before);
        }
    }
}

#[rstest]
fn assignments_respect_capacity_and_detour(constraints: MatchConstraints) {
    let (clusters, vehicles) = city();
    let outcome =
        GeneticMatcher::with_config(small_config()).assign(&clusters, &vehicles, &constraints);
    let by_id: HashMap<u64, &Cluster> = clusters.iter().map(|c| (c.id, c)).collect();
    for assignment in &outcome.assignments {
        let vehicle = vehicles
            .iter()
            .find(|v| v.id == assignment.vehicle_id)
            .expect("assigned vehicle exists");
        assert!(assignment.passenger_count() <= vehicle.seats());
        for cluster_id in &assignment.cluster_ids {
            let cluster = by_id.get(cluster_id).expect("assigned cluster exists");
            let reach = rideshare_core::haversine_km(vehicle.location, cluster.centroid);
            assert!(reach <= constraints.max_detour_km * assignment.relaxation_factor + 1e-9);
        }
    }
}

#[rstest]
fn every_request_is_served_or_reported(constraints: MatchConstraints) {
    let (clusters, vehicles) = city();
    let outcome =
        GeneticMatcher::with_config(small_config()).assign(&clusters, &vehicles, &constraints);
    let mut seen: Vec<u64> = outcome
        .assignments
        .iter()
        .flat_map(|a| a.request_ids.iter().copied())
        .chain(outcome.unassigned_request_ids.iter().copied())
        .collect();
    seen.sort_unstable();
    let mut expected: Vec<u64> = clusters.iter().flat_map(Cluster::request_ids).collect();
    expected.sort_unstable();
    assert_eq!(seen, expected);
    let unique: HashSet<u64> = seen.iter().copied().collect();
    assert_eq!(unique.len(), seen.len());
}

#[rstest]
fn distant_clusters_fall_back_to_relaxed_detours(constraints: MatchConstraints) {
    let clusters = vec![cluster_at(0, 40.70, -74.00, 1)];
    let vehicles = vec![vehicle_at(0, 40.70 + 9.0 * KM_LAT, -74.00, 4)];
    let outcome = GeneticMatcher::new().assign(&clusters, &vehicles, &constraints);
    let assignment = outcome.assignments.first().expect("relaxed assignment");
    assert!((assignment.relaxation_factor - 2.0).abs() < f64::EPSILON);
    assert_eq!(outcome.diagnostics.post_processed_clusters, 1);
}

#[rstest]
fn disabling_relaxation_leaves_distant_clusters_unassigned(constraints: MatchConstraints) {
    let clusters = vec![cluster_at(0, 40.70, -74.00, 1)];
    let vehicles = vec![vehicle_at(0, 40.70 + 9.0 * KM_LAT, -74.00, 4)];
    let matcher = GeneticMatcher::with_config(GeneticMatcherConfig {
        relaxation_factors: Vec::new(),
        ..GeneticMatcherConfig::default()
    });
    let outcome = matcher.assign(&clusters, &vehicles, &constraints);
    assert!(outcome.assignments.is_empty());
    assert_eq!(outcome.unassigned_request_ids, vec![0]);
}

#[rstest]
fn observer_sees_generations_and_convergence(constraints: MatchConstraints) {
    let (clusters, vehicles) = city();
    let observer = Arc::new(RecordingObserver::default());
    let matcher = GeneticMatcher::with_config(small_config()).with_observer(observer.clone());
    let outcome = matcher.assign(&clusters, &vehicles, &constraints);
    let events = observer.events();
    let generations = events
        .iter()
        .filter(|e| matches!(e, SearchEvent::GenerationCompleted { .. }))
        .count();
    assert_eq!(generations, outcome.diagnostics.generations_run);
    let converged = events
        .iter()
        .filter(|e| matches!(e, SearchEvent::Converged { .. }))
        .count();
    assert_eq!(converged, 1);
}

#[rstest]
fn a_zero_population_is_treated_as_one(constraints: MatchConstraints) {
    let clusters = vec![cluster_at(0, 40.70, -74.00, 1)];
    let vehicles = vec![vehicle_at(0, 40.70, -74.00, 4)];
    let matcher = GeneticMatcher::with_config(GeneticMatcherConfig {
        population_size: 0,
        max_generations: 3,
        ..GeneticMatcherConfig::default()
    });
    let outcome = matcher.assign(&clusters, &vehicles, &constraints);
    assert_eq!(outcome.assignments.len(), 1);
}

#[rstest]
fn caller_supplied_rng_is_used(constraints: MatchConstraints) {
    let (clusters, vehicles) = city();
    let matcher = GeneticMatcher::with_config(small_config());
    let mut a = ChaCha8Rng::seed_from_u64(3);
    let mut b = ChaCha8Rng::seed_from_u64(3);
    let first = matcher.assign_with_rng(&clusters, &vehicles, &constraints, &mut a);
    let second = matcher.assign_with_rng(&clusters, &vehicles, &constraints, &mut b);
    assert_eq!(first.assignments, second.assignments);
}
