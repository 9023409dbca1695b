//! Capacity-constrained vehicles.

use thiserror::Error;

use crate::Coordinate;

/// Errors returned by [`Vehicle::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VehicleError {
    /// A vehicle must seat at least one passenger.
    #[error("vehicle {id} must have a capacity greater than zero")]
    ZeroCapacity {
        /// Identifier of the rejected vehicle.
        id: u64,
    },
}

/// A vehicle able to carry pooled passengers.
///
/// The optimizer never mutates vehicles it is handed. Working seat counts live
/// in per-candidate ledgers instead, so a single vehicle list can be shared
/// across every candidate of a search.
///
/// # Examples
/// ```
/// use rideshare_core::{Vehicle, coordinate};
///
/// # fn main() -> Result<(), rideshare_core::VehicleError> {
/// let vehicle = Vehicle::new(3, coordinate(40.7, -74.0), 4)?;
/// assert_eq!(vehicle.available_seats, 4);
/// assert!(vehicle.current_route.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// Unique identifier within a run.
    pub id: u64,
    /// Current position.
    pub location: Coordinate,
    /// Total passenger seats.
    pub capacity: u32,
    /// Seats still free, always within `0..=capacity`.
    pub available_seats: u32,
    /// Waypoints the vehicle is already committed to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub current_route: Vec<Coordinate>,
}

impl Vehicle {
    /// Construct an empty vehicle with every seat available.
    ///
    /// # Errors
    /// Returns [`VehicleError::ZeroCapacity`] when `capacity` is zero.
    pub const fn new(id: u64, location: Coordinate, capacity: u32) -> Result<Self, VehicleError> {
        Self::with_available_seats(id, location, capacity, capacity)
    }

    /// Construct a partially occupied vehicle.
    ///
    /// `available_seats` is clamped to `capacity`.
    ///
    /// # Errors
    /// Returns [`VehicleError::ZeroCapacity`] when `capacity` is zero.
    pub const fn with_available_seats(
        id: u64,
        location: Coordinate,
        capacity: u32,
        available_seats: u32,
    ) -> Result<Self, VehicleError> {
        if capacity == 0 {
            return Err(VehicleError::ZeroCapacity { id });
        }
        let seats = if available_seats > capacity {
            capacity
        } else {
            available_seats
        };
        Ok(Self {
            id,
            location,
            capacity,
            available_seats: seats,
            current_route: Vec::new(),
        })
    }

    /// Seats usable by the optimizer, as a request count.
    #[must_use]
    pub fn seats(&self) -> usize {
        usize::try_from(self.available_seats.min(self.capacity)).unwrap_or(usize::MAX)
    }
}
