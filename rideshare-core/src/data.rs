//! Sources of synthetic or recorded demand and supply.
//!
//! A [`DataAdapter`] produces the ride requests and vehicles a simulation run
//! works with. The bundled adapters generate uniform random scenarios; other
//! implementations may replay recorded trips.

use geo::Rect;

use crate::{RideRequest, Vehicle};

/// Geographic bounding box, `min` = south-west and `max` = north-east.
pub type Bounds = Rect<f64>;

/// Produce ride requests and vehicles for a simulation.
///
/// Implementations must return exactly `count` items with unique
/// identifiers, all located inside `bounds`, and every vehicle must have a
/// non-zero capacity.
///
/// # Examples
///
/// ```rust
/// use geo::Rect;
/// use rideshare_core::{Bounds, DataAdapter, RideRequest, Vehicle, coordinate};
///
/// struct Corner;
///
/// impl DataAdapter for Corner {
///     fn generate_requests(&self, count: usize, bounds: &Bounds) -> Vec<RideRequest> {
///         (0_u64..)
///             .take(count)
///             .map(|id| RideRequest::new(id, bounds.min(), bounds.max(), 0))
///             .collect()
///     }
///
///     fn generate_vehicles(&self, count: usize, bounds: &Bounds) -> Vec<Vehicle> {
///         (0_u64..)
///             .take(count)
///             .filter_map(|id| Vehicle::new(id, bounds.min(), 4).ok())
///             .collect()
///     }
/// }
///
/// let bounds = Rect::new(coordinate(0.0, 0.0), coordinate(1.0, 1.0));
/// assert_eq!(Corner.generate_requests(3, &bounds).len(), 3);
/// ```
pub trait DataAdapter: Send + Sync {
    /// Return `count` ride requests inside `bounds`.
    fn generate_requests(&self, count: usize, bounds: &Bounds) -> Vec<RideRequest>;

    /// Return `count` vehicles inside `bounds`.
    fn generate_vehicles(&self, count: usize, bounds: &Bounds) -> Vec<Vehicle>;

    /// Return `count` vehicles placed near the pickups of `requests`.
    ///
    /// The default ignores `requests` and defers to
    /// [`DataAdapter::generate_vehicles`].
    fn generate_vehicles_near(
        &self,
        count: usize,
        requests: &[RideRequest],
        bounds: &Bounds,
    ) -> Vec<Vehicle> {
        let _ = requests;
        self.generate_vehicles(count, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate;
    use crate::test_support::FixedDataAdapter;
    use rstest::rstest;

    #[rstest]
    fn fixed_adapter_truncates_to_requested_count() {
        let origin = coordinate(0.0, 0.0);
        let adapter = FixedDataAdapter::new(
            vec![
                RideRequest::new(1, origin, origin, 0),
                RideRequest::new(2, origin, origin, 0),
            ],
            Vec::new(),
        );
        let bounds = Rect::new(origin, coordinate(1.0, 1.0));
        assert_eq!(adapter.generate_requests(1, &bounds).len(), 1);
        assert!(adapter.generate_vehicles(5, &bounds).is_empty());
    }

    #[rstest]
    fn vehicles_near_defaults_to_plain_generation() {
        let origin = coordinate(0.0, 0.0);
        let vehicle = Vehicle::new(3, origin, 2).expect("valid capacity");
        let adapter = FixedDataAdapter::new(Vec::new(), vec![vehicle.clone()]);
        let bounds = Rect::new(origin, coordinate(1.0, 1.0));
        assert_eq!(adapter.generate_vehicles_near(1, &[], &bounds), vec![vehicle]);
    }
}
