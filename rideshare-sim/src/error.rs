//! Failures of a simulation run.

use rideshare_core::RoutingError;
use thiserror::Error;

/// Errors returned by
/// [`SimulationOrchestrator`](crate::SimulationOrchestrator).
///
/// Infeasible matches are not errors; they surface as unassigned requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The routing engine rejected a vehicle's waypoints.
    #[error("failed to route vehicle {vehicle_id}")]
    Routing {
        /// Vehicle whose assignment could not be routed.
        vehicle_id: u64,
        /// Underlying routing failure.
        #[source]
        source: RoutingError,
    },
}
