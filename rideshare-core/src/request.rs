//! Ride requests submitted by passengers.

use crate::Coordinate;

/// A single passenger's request for a ride.
///
/// Requests are created by a [`DataAdapter`](crate::DataAdapter) and are
/// read-only for the rest of a simulation run.
///
/// # Examples
/// ```
/// use rideshare_core::{RideRequest, coordinate};
///
/// let request = RideRequest::new(
///     7,
///     coordinate(40.70, -74.00),
///     coordinate(40.75, -73.98),
///     60_000,
/// );
/// assert_eq!(request.id, 7);
/// assert_eq!(request.timestamp_ms, 60_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RideRequest {
    /// Unique identifier within a run.
    pub id: u64,
    /// Where the passenger waits.
    pub pickup: Coordinate,
    /// Where the passenger wants to go.
    pub dropoff: Coordinate,
    /// Submission instant in milliseconds on the simulation clock.
    pub timestamp_ms: u64,
}

impl RideRequest {
    /// Construct a request.
    #[must_use]
    pub const fn new(id: u64, pickup: Coordinate, dropoff: Coordinate, timestamp_ms: u64) -> Self {
        Self {
            id,
            pickup,
            dropoff,
            timestamp_ms,
        }
    }

    /// Absolute time between two requests, in minutes.
    ///
    /// # Examples
    /// ```
    /// use rideshare_core::{RideRequest, coordinate};
    ///
    /// let origin = coordinate(0.0, 0.0);
    /// let a = RideRequest::new(1, origin, origin, 0);
    /// let b = RideRequest::new(2, origin, origin, 90_000);
    /// assert_eq!(a.minutes_apart(&b), 1.5);
    /// assert_eq!(b.minutes_apart(&a), 1.5);
    /// ```
    #[must_use]
    pub fn minutes_apart(&self, other: &Self) -> f64 {
        minutes_between(self.timestamp_ms, other.timestamp_ms)
    }
}

/// Absolute difference between two millisecond instants, in minutes.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "converts milliseconds to minutes")]
pub fn minutes_between(a_ms: u64, b_ms: u64) -> f64 {
    let millis = a_ms.abs_diff(b_ms);
    // Sub-millisecond precision is irrelevant at minute granularity.
    #[expect(
        clippy::cast_precision_loss,
        reason = "millisecond spans stay far below 2^52"
    )]
    let millis_f = millis as f64;
    millis_f / 60_000.0
}
