//! Cluster-to-vehicle assignments and the matcher contract.

use std::time::Duration;

use crate::{Cluster, Coordinate, Vehicle};

/// The work handed to one vehicle.
///
/// `route` starts at the vehicle's location, visits every pickup, then every
/// dropoff. Routing engines may later reorder or densify it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// Vehicle receiving the work.
    pub vehicle_id: u64,
    /// Clusters served, in cluster order.
    pub cluster_ids: Vec<u64>,
    /// Passengers served, unique within the assignment.
    pub request_ids: Vec<u64>,
    /// Ordered waypoints.
    pub route: Vec<Coordinate>,
    /// Largest detour relaxation used to admit any of the clusters.
    pub relaxation_factor: f64,
}

impl Assignment {
    /// Number of passengers carried.
    #[must_use]
    pub const fn passenger_count(&self) -> usize {
        self.request_ids.len()
    }
}

/// Hard limits a matcher must respect.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchConstraints {
    /// Furthest a vehicle may travel to reach a cluster centroid, in
    /// kilometres, before any relaxation.
    pub max_detour_km: f64,
}

/// Search statistics reported alongside a [`MatchOutcome`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchDiagnostics {
    /// Wall-clock time spent searching.
    pub solve_time: Duration,
    /// Generations (or iterations) actually executed.
    pub generations_run: usize,
    /// Incumbent fitness after each generation, starting with the initial
    /// population.
    pub best_fitness_history: Vec<f64>,
    /// Incumbent assignment ratio after each generation.
    pub assignment_ratio_history: Vec<f64>,
    /// Clusters placed by the post-search repair pass.
    pub post_processed_clusters: usize,
}

/// Result of a matching run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchOutcome {
    /// One entry per vehicle that received at least one cluster.
    pub assignments: Vec<Assignment>,
    /// Requests that no vehicle could serve.
    pub unassigned_request_ids: Vec<u64>,
    /// Search statistics.
    pub diagnostics: MatchDiagnostics,
}

impl MatchOutcome {
    /// An outcome in which every request of `clusters` is unassigned.
    #[must_use]
    pub fn unmatched(clusters: &[Cluster]) -> Self {
        Self {
            assignments: Vec::new(),
            unassigned_request_ids: clusters.iter().flat_map(Cluster::request_ids).collect(),
            diagnostics: MatchDiagnostics::default(),
        }
    }
}

/// Assign clusters of requests to vehicles.
///
/// Implementations must never exceed a vehicle's available seats, must report
/// every request they leave unserved, and must return an outcome without
/// assignments when either input is empty. Infeasibility is not an error.
pub trait Matcher: Send + Sync {
    /// Search for a good assignment of `clusters` onto `vehicles`.
    fn assign(
        &self,
        clusters: &[Cluster],
        vehicles: &[Vehicle],
        constraints: &MatchConstraints,
    ) -> MatchOutcome;
}
