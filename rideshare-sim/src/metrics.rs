//! Aggregate quality measures of a simulation run.
//!
//! Both distance metrics compare each routed tour with a sequential baseline
//! in which the same vehicle serves its passengers one at a time, in
//! submission order: start, pickup 1, dropoff 1, pickup 2, dropoff 2, and so
//! on. Legs are measured with [`RoutingEngine::distance`].

use std::collections::{HashMap, HashSet};

use rideshare_core::{Assignment, Coordinate, RideRequest, RoutingEngine};

/// Summary statistics of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Requests served as a percentage of all requests.
    pub percentage_matched: f64,
    /// Extra kilometres per served passenger compared with the sequential
    /// baseline. Negative when pooling shortens the tours.
    pub average_detour_km: f64,
    /// Kilometres saved by the routed tours compared with the sequential
    /// baseline.
    pub total_distance_saved_km: f64,
}

impl Metrics {
    /// Compute metrics for `assignments` drawn from `requests`.
    ///
    /// Each metric is zero when its denominator is zero. Request ids in an
    /// assignment that are missing from `requests` are ignored by the
    /// baseline.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "metrics are ratios of sums")]
    pub fn compute<R>(requests: &[RideRequest], assignments: &[Assignment], router: &R) -> Self
    where
        R: RoutingEngine + ?Sized,
    {
        let by_id: HashMap<u64, &RideRequest> = requests.iter().map(|r| (r.id, r)).collect();
        let matched: HashSet<u64> = assignments
            .iter()
            .flat_map(|a| a.request_ids.iter().copied())
            .collect();

        let mut optimised = 0.0;
        let mut sequential = 0.0;
        let mut served = 0_usize;
        for assignment in assignments {
            let Some(start) = assignment.route.first().copied() else {
                continue;
            };
            optimised += router.route_length(&assignment.route);
            sequential += sequential_length(router, start, assignment, &by_id);
            served += assignment.request_ids.len();
        }

        let percentage_matched = if requests.is_empty() {
            0.0
        } else {
            count_f64(matched.len()) / count_f64(requests.len()) * 100.0
        };
        let average_detour_km = if served == 0 {
            0.0
        } else {
            (optimised - sequential) / count_f64(served)
        };

        Self {
            percentage_matched,
            average_detour_km,
            total_distance_saved_km: sequential - optimised,
        }
    }
}

/// Length of the one-passenger-at-a-time tour from `start`.
fn sequential_length<R>(
    router: &R,
    start: Coordinate,
    assignment: &Assignment,
    by_id: &HashMap<u64, &RideRequest>,
) -> f64
where
    R: RoutingEngine + ?Sized,
{
    let mut passengers: Vec<&RideRequest> = assignment
        .request_ids
        .iter()
        .filter_map(|id| by_id.get(id).copied())
        .collect();
    passengers.sort_by_key(|r| (r.timestamp_ms, r.id));

    let mut tour = Vec::with_capacity(1 + 2 * passengers.len());
    tour.push(start);
    for passenger in passengers {
        tour.push(passenger.pickup);
        tour.push(passenger.dropoff);
    }
    router.route_length(&tour)
}

fn count_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}
