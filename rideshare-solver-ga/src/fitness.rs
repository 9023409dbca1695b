//! Candidate scoring.

use rideshare_core::{haversine_km, path_length_km};

use crate::FitnessWeights;
use crate::problem::{Problem, count_f64};

/// Score of a single candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Evaluation {
    /// Higher is better.
    pub(crate) fitness: f64,
    /// Share of all requests that the candidate serves, in `[0, 1]`.
    pub(crate) assignment_ratio: f64,
}

impl Evaluation {
    /// Whether `self` may replace `incumbent`: strictly fitter without
    /// serving fewer passengers.
    pub(crate) fn improves_on(&self, incumbent: &Self) -> bool {
        self.fitness > incumbent.fitness && self.assignment_ratio >= incumbent.assignment_ratio
    }
}

/// Clusters served by each vehicle, in cluster order.
pub(crate) fn clusters_by_vehicle(
    problem: &Problem<'_>,
    genes: &[Option<usize>],
) -> Vec<Vec<usize>> {
    let mut served = vec![Vec::new(); problem.vehicle_count()];
    for (cluster, gene) in genes.iter().enumerate() {
        if let Some(list) = gene.and_then(|vehicle| served.get_mut(vehicle)) {
            list.push(cluster);
        }
    }
    served
}

/// Evaluate `genes` against `problem`.
///
/// `fitness = w_assign * ratio - w_detour * detour + w_util * utilisation -
/// idle_penalty`. The normalised detour is capped at `1` from above only, so
/// pooling that saves distance earns a bonus. The idle penalty only applies
/// while some cluster is left unassigned.
#[expect(
    clippy::float_arithmetic,
    reason = "fitness is a weighted sum of ratios"
)]
pub(crate) fn evaluate(
    problem: &Problem<'_>,
    weights: &FitnessWeights,
    genes: &[Option<usize>],
) -> Evaluation {
    let served = clusters_by_vehicle(problem, genes);
    let assigned: usize = genes
        .iter()
        .enumerate()
        .filter(|(_, gene)| gene.is_some())
        .map(|(cluster, _)| problem.size(cluster))
        .sum();
    let assignment_ratio = ratio(assigned, problem.total_requests());

    let total_detour: f64 = served
        .iter()
        .enumerate()
        .filter(|(_, clusters)| !clusters.is_empty())
        .map(|(vehicle, clusters)| vehicle_detour(problem, vehicle, clusters))
        .sum();
    let normalised_detour = if assigned == 0 {
        0.0
    } else {
        let per_passenger = total_detour / count_f64(assigned);
        let limit = problem.max_detour_km();
        if limit > 0.0 {
            (per_passenger / limit).min(1.0)
        } else if per_passenger > 0.0 {
            1.0
        } else {
            0.0
        }
    };

    let used = served.iter().filter(|clusters| !clusters.is_empty()).count();
    let utilisation = ratio(used, problem.vehicle_count());
    let idle_penalty = if genes.iter().any(Option::is_none) {
        weights.idle_penalty * ratio(problem.vehicle_count() - used, problem.vehicle_count())
    } else {
        0.0
    };

    Evaluation {
        fitness: weights.assignment * assignment_ratio - weights.detour * normalised_detour
            + weights.utilisation * utilisation
            - idle_penalty,
        assignment_ratio,
    }
}

/// Extra distance `vehicle` drives to pool `clusters` compared with serving
/// each dropoff directly. Negative when pooled passengers share dropoffs.
#[expect(clippy::float_arithmetic, reason = "detour is a difference of distances")]
fn vehicle_detour(problem: &Problem<'_>, vehicle: usize, clusters: &[usize]) -> f64 {
    let Some(start) = problem.vehicles().get(vehicle).map(|v| v.location) else {
        return 0.0;
    };
    let routed = path_length_km(&problem.route(vehicle, clusters));
    let direct: f64 = clusters
        .iter()
        .filter_map(|index| problem.clusters().get(*index))
        .flat_map(|cluster| cluster.requests.iter())
        .map(|request| haversine_km(start, request.dropoff))
        .sum();
    routed - direct
}

#[expect(clippy::float_arithmetic, reason = "ratio of two counts")]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        count_f64(part) / count_f64(whole)
    }
}

#[cfg(test)]
#[expect(clippy::float_arithmetic, reason = "assertions compare floats")]
mod tests {
    use super::*;
    use rideshare_core::test_support::{cluster_at, vehicle_at};
    use rideshare_core::{Cluster, RideRequest, coordinate};
    use rstest::{fixture, rstest};

    #[fixture]
    fn weights() -> FitnessWeights {
        FitnessWeights::default()
    }

    #[rstest]
    fn empty_candidate_scores_only_the_idle_penalty(weights: FitnessWeights) {
        let clusters = vec![cluster_at(0, 40.70, -74.00, 2)];
        let vehicles = vec![vehicle_at(0, 40.70, -74.00, 4)];
        let problem = Problem::new(&clusters, &vehicles, 5.0);
        let evaluation = evaluate(&problem, &weights, &[None]);
        assert!(evaluation.assignment_ratio.abs() < f64::EPSILON);
        assert!((evaluation.fitness + weights.idle_penalty).abs() < 1e-12);
    }

    #[rstest]
    fn full_assignment_skips_idle_penalty(weights: FitnessWeights) {
        let clusters = vec![cluster_at(0, 40.70, -74.00, 2)];
        let vehicles = vec![
            vehicle_at(0, 40.70, -74.00, 4),
            vehicle_at(1, 40.80, -74.00, 4),
        ];
        let problem = Problem::new(&clusters, &vehicles, 5.0);
        let evaluation = evaluate(&problem, &weights, &[Some(0)]);
        assert!((evaluation.assignment_ratio - 1.0).abs() < f64::EPSILON);
        // One leg to the shared dropoff instead of two direct trips.
        let leg = haversine_km(coordinate(40.70, -74.00), coordinate(40.71, -73.99));
        let detour = -leg / 2.0 / 5.0;
        let expected =
            weights.assignment - weights.detour * detour + weights.utilisation * 0.5;
        assert!((evaluation.fitness - expected).abs() < 1e-9, "got {}", evaluation.fitness);
    }

    #[rstest]
    fn serving_more_passengers_scores_higher(weights: FitnessWeights) {
        let clusters = vec![cluster_at(0, 40.70, -74.00, 2), cluster_at(1, 40.70, -74.00, 1)];
        let vehicles = vec![vehicle_at(0, 40.70, -74.00, 4)];
        let problem = Problem::new(&clusters, &vehicles, 5.0);
        let partial = evaluate(&problem, &weights, &[Some(0), None]);
        let full = evaluate(&problem, &weights, &[Some(0), Some(0)]);
        assert!(full.fitness > partial.fitness);
        assert!(full.improves_on(&partial));
        assert!(!partial.improves_on(&full));
    }

    #[rstest]
    fn detour_is_penalised(weights: FitnessWeights) {
        let clusters = vec![cluster_at(0, 40.70, -74.00, 1)];
        let near = vec![vehicle_at(0, 40.70, -74.00, 4)];
        let far = vec![vehicle_at(0, 40.72, -74.00, 4)];
        let near_problem = Problem::new(&clusters, &near, 5.0);
        let far_problem = Problem::new(&clusters, &far, 5.0);
        let near_fitness = evaluate(&near_problem, &weights, &[Some(0)]).fitness;
        let far_fitness = evaluate(&far_problem, &weights, &[Some(0)]).fitness;
        assert!(near_fitness > far_fitness);
    }

    #[rstest]
    fn shared_far_dropoff_earns_a_pooling_bonus(weights: FitnessWeights) {
        let pickup = coordinate(40.70, -74.00);
        let dropoff = coordinate(40.80, -74.00);
        let clusters = vec![Cluster {
            id: 0,
            centroid: pickup,
            requests: (1..=3)
                .map(|id| RideRequest::new(id, pickup, dropoff, 0))
                .collect(),
        }];
        let vehicles = vec![vehicle_at(0, 40.70, -74.00, 4)];
        let problem = Problem::new(&clusters, &vehicles, 5.0);

        let evaluation = evaluate(&problem, &weights, &[Some(0)]);

        let leg = haversine_km(pickup, dropoff);
        let normalised = (leg - 3.0 * leg) / 3.0 / 5.0;
        assert!(normalised < -1.0, "detour should be well below zero: {normalised}");
        let expected = weights.assignment - weights.detour * normalised + weights.utilisation;
        assert!(
            (evaluation.fitness - expected).abs() < 1e-9,
            "got {} expected {expected}",
            evaluation.fitness
        );
        assert!((evaluation.fitness - 1.0965).abs() < 1e-3);
    }

    #[rstest]
    fn a_fitter_candidate_with_a_lower_ratio_is_rejected() {
        let incumbent = Evaluation {
            fitness: 0.5,
            assignment_ratio: 0.8,
        };
        let challenger = Evaluation {
            fitness: 0.6,
            assignment_ratio: 0.7,
        };
        assert!(!challenger.improves_on(&incumbent));
    }

    #[rstest]
    fn clusters_are_grouped_per_vehicle() {
        let clusters = vec![
            cluster_at(0, 40.70, -74.00, 1),
            cluster_at(1, 40.70, -74.00, 1),
            cluster_at(2, 40.70, -74.00, 1),
        ];
        let vehicles = vec![vehicle_at(0, 40.70, -74.00, 4), vehicle_at(1, 40.70, -74.00, 4)];
        let problem = Problem::new(&clusters, &vehicles, 5.0);
        let served = clusters_by_vehicle(&problem, &[Some(1), None, Some(1)]);
        assert_eq!(served, vec![Vec::new(), vec![0, 2]]);
    }
}
