//! `SimulationOrchestrator`: generation, clustering, matching, routing and
//! metrics in one synchronous pass.

use std::collections::HashSet;

use rideshare_core::{
    Assignment, Cluster, ClusterParams, Clusterer, DataAdapter, MatchConstraints, MatchDiagnostics,
    Matcher, RideRequest, RoutingEngine, Vehicle,
};

use crate::{Metrics, SimulationError, SimulationParams};

/// Everything a simulation run produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    /// Every request considered, in generation order.
    pub requests: Vec<RideRequest>,
    /// Every vehicle available, in generation order.
    pub vehicles: Vec<Vehicle>,
    /// Clusters of the requests inside the time window.
    pub clusters: Vec<Cluster>,
    /// Routed assignments, one per vehicle in use.
    pub assignments: Vec<Assignment>,
    /// Requests no assignment serves, including those outside the window.
    pub unassigned_requests: Vec<RideRequest>,
    /// Aggregate quality measures.
    pub metrics: Metrics,
    /// Statistics reported by the matcher.
    pub diagnostics: MatchDiagnostics,
}

/// Run the pooling pipeline over injected collaborators.
///
/// The orchestrator is generic over the data source, the routing engine, the
/// clusterer and the matcher, so each can be swapped independently.
#[derive(Debug, Clone)]
pub struct SimulationOrchestrator<D, R, C, M>
where
    D: DataAdapter,
    R: RoutingEngine,
    C: Clusterer,
    M: Matcher,
{
    data: D,
    router: R,
    clusterer: C,
    matcher: M,
}

impl<D, R, C, M> SimulationOrchestrator<D, R, C, M>
where
    D: DataAdapter,
    R: RoutingEngine,
    C: Clusterer,
    M: Matcher,
{
    /// Assemble an orchestrator from its collaborators.
    #[must_use]
    pub const fn new(data: D, router: R, clusterer: C, matcher: M) -> Self {
        Self {
            data,
            router,
            clusterer,
            matcher,
        }
    }

    /// Generate a scenario with the data adapter, then simulate it.
    ///
    /// # Errors
    /// Returns [`SimulationError::Routing`] when the routing engine rejects an
    /// assignment.
    pub fn run(&self, params: &SimulationParams) -> Result<SimulationResult, SimulationError> {
        let requests = self
            .data
            .generate_requests(params.passenger_count, &params.bounds);
        let vehicles = if params.vehicles_near_requests {
            self.data
                .generate_vehicles_near(params.vehicle_count, &requests, &params.bounds)
        } else {
            self.data
                .generate_vehicles(params.vehicle_count, &params.bounds)
        };
        self.run_with_inputs(requests, vehicles, params)
    }

    /// Simulate a supplied scenario. `passenger_count`, `vehicle_count`,
    /// `bounds` and `vehicles_near_requests` are ignored.
    ///
    /// # Errors
    /// Returns [`SimulationError::Routing`] when the routing engine rejects an
    /// assignment.
    pub fn run_with_inputs(
        &self,
        requests: Vec<RideRequest>,
        vehicles: Vec<Vehicle>,
        params: &SimulationParams,
    ) -> Result<SimulationResult, SimulationError> {
        let now_ms = params
            .now_ms
            .or_else(|| requests.iter().map(|r| r.timestamp_ms).max())
            .unwrap_or(0);
        let max_detour_km = params.effective_max_detour_km();
        let cluster_params = ClusterParams {
            time_window_minutes: params.effective_time_window_minutes(),
            max_distance_km: max_detour_km,
            now_ms,
        };

        let clusters = self.clusterer.cluster(&requests, &cluster_params);
        let outcome = self
            .matcher
            .assign(&clusters, &vehicles, &MatchConstraints { max_detour_km });
        let assignments = self.route(outcome.assignments)?;

        let served: HashSet<u64> = assignments
            .iter()
            .flat_map(|a| a.request_ids.iter().copied())
            .collect();
        let unassigned_requests: Vec<RideRequest> = requests
            .iter()
            .filter(|r| !served.contains(&r.id))
            .cloned()
            .collect();
        let metrics = Metrics::compute(&requests, &assignments, &self.router);
        log::debug!(
            "simulated {} requests and {} vehicles: {} clusters, {} assignments, {:.1}% matched",
            requests.len(),
            vehicles.len(),
            clusters.len(),
            assignments.len(),
            metrics.percentage_matched
        );

        Ok(SimulationResult {
            requests,
            vehicles,
            clusters,
            assignments,
            unassigned_requests,
            metrics,
            diagnostics: outcome.diagnostics,
        })
    }

    /// Replace every assignment's waypoints with the routing engine's route.
    fn route(&self, assignments: Vec<Assignment>) -> Result<Vec<Assignment>, SimulationError> {
        assignments
            .into_iter()
            .map(|mut assignment| {
                assignment.route = self
                    .router
                    .calculate_route(&assignment.route)
                    .map_err(|source| SimulationError::Routing {
                        vehicle_id: assignment.vehicle_id,
                        source,
                    })?;
                Ok(assignment)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
