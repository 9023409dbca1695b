//! Routing engine trait for ordered waypoint sequences.

use crate::Coordinate;

use super::error::RoutingError;

/// Produce concrete routes and leg distances.
///
/// `calculate_route` may reorder or augment the waypoints, but the first
/// returned point must remain the vehicle's start. `distance` returns
/// kilometres and must be symmetric and non-negative.
///
/// # Examples
///
/// ```rust
/// use rideshare_core::{Coordinate, RoutingEngine, RoutingError, coordinate, haversine_km};
///
/// struct Echo;
///
/// impl RoutingEngine for Echo {
///     fn calculate_route(&self, points: &[Coordinate]) -> Result<Vec<Coordinate>, RoutingError> {
///         if points.is_empty() {
///             return Err(RoutingError::EmptyRoute);
///         }
///         Ok(points.to_vec())
///     }
///
///     fn distance(&self, a: Coordinate, b: Coordinate) -> f64 {
///         haversine_km(a, b)
///     }
/// }
///
/// let route = Echo.calculate_route(&[coordinate(0.0, 0.0), coordinate(0.0, 1.0)])?;
/// assert_eq!(route.len(), 2);
/// # Ok::<(), RoutingError>(())
/// ```
pub trait RoutingEngine: Send + Sync {
    /// Return the ordered waypoints a vehicle should follow.
    ///
    /// Implementations must return `Err(RoutingError::EmptyRoute)` when
    /// `points` is empty.
    fn calculate_route(&self, points: &[Coordinate]) -> Result<Vec<Coordinate>, RoutingError>;

    /// Distance in kilometres between two waypoints.
    fn distance(&self, a: Coordinate, b: Coordinate) -> f64;

    /// Length of a routed tour, summing [`RoutingEngine::distance`] over
    /// consecutive waypoints.
    fn route_length(&self, route: &[Coordinate]) -> f64 {
        route
            .windows(2)
            .map(|leg| match leg {
                [from, to] => self.distance(*from, *to),
                _ => 0.0,
            })
            .sum()
    }
}
