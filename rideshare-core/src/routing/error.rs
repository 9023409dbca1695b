use thiserror::Error;

/// Errors from [`crate::routing::RoutingEngine::calculate_route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// No waypoints were provided.
    ///
    /// Engines require at least one waypoint. Callers should skip empty
    /// assignments instead of routing them.
    #[error("at least one waypoint is required")]
    EmptyRoute,
    /// The engine could not connect the waypoints.
    #[error("no route connects the waypoints: {reason}")]
    Unroutable {
        /// Engine-specific explanation.
        reason: String,
    },
}
