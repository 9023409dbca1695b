//! Routing engine that connects waypoints with straight lines.

use rideshare_core::{Coordinate, RoutingEngine, RoutingError, haversine_km};

/// Echo the waypoints unchanged and measure legs along great circles.
///
/// # Examples
/// ```
/// use rideshare_core::{RoutingEngine, coordinate};
/// use rideshare_sim::StraightLineRouter;
///
/// let route = StraightLineRouter
///     .calculate_route(&[coordinate(40.70, -74.00), coordinate(40.75, -73.98)])
///     .expect("non-empty waypoints");
/// assert_eq!(route.len(), 2);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct StraightLineRouter;

impl RoutingEngine for StraightLineRouter {
    fn calculate_route(&self, points: &[Coordinate]) -> Result<Vec<Coordinate>, RoutingError> {
        if points.is_empty() {
            return Err(RoutingError::EmptyRoute);
        }
        Ok(points.to_vec())
    }

    fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
        haversine_km(a, b)
    }
}
