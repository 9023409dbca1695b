//! Great-circle geometry over WGS84 coordinates.
//!
//! Every distance in the engine is measured in kilometres along the surface
//! of a spherical Earth. Routing engines may substitute road distances for
//! route legs, but clustering and feasibility checks always use
//! [`haversine_km`].

use geo::{Centroid, Coord, MultiPoint, Point};
use thiserror::Error;

/// A WGS84 position with `x = longitude` and `y = latitude`, in degrees.
pub type Coordinate = Coord<f64>;

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors raised by geometry helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    /// No coordinates were supplied.
    ///
    /// Callers must guard against empty point sets, e.g. empty clusters,
    /// before asking for a centroid.
    #[error("at least one coordinate is required")]
    EmptyInput,
}

/// Build a [`Coordinate`] from latitude and longitude.
///
/// # Examples
/// ```
/// use rideshare_core::coordinate;
///
/// let c = coordinate(40.7, -74.0);
/// assert_eq!(c.y, 40.7);
/// assert_eq!(c.x, -74.0);
/// ```
#[must_use]
pub const fn coordinate(lat: f64, lng: f64) -> Coordinate {
    Coord { x: lng, y: lat }
}

/// Great-circle distance between `a` and `b` in kilometres.
///
/// The result is symmetric and zero when both coordinates coincide.
///
/// # Examples
/// ```
/// use rideshare_core::{coordinate, haversine_km};
///
/// let a = coordinate(0.0, 0.0);
/// let b = coordinate(0.0, 1.0);
/// let km = haversine_km(a, b);
/// assert!((km - 111.19).abs() < 0.01);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine formula is trigonometry over radians"
)]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.y.to_radians(), a.x.to_radians());
    let (lat2, lon2) = (b.y.to_radians(), b.x.to_radians());
    let sin_dlat = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon = ((lon2 - lon1) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_KM * c
}

/// Arithmetic mean of the latitudes and longitudes of `points`.
///
/// # Errors
/// Returns [`GeoError::EmptyInput`] when `points` is empty.
///
/// # Examples
/// ```
/// use rideshare_core::{GeoError, centroid, coordinate};
///
/// let mid = centroid(&[coordinate(0.0, 0.0), coordinate(2.0, 4.0)])?;
/// assert_eq!(mid, coordinate(1.0, 2.0));
/// assert_eq!(centroid(&[]), Err(GeoError::EmptyInput));
/// # Ok::<(), GeoError>(())
/// ```
pub fn centroid(points: &[Coordinate]) -> Result<Coordinate, GeoError> {
    let multi: MultiPoint<f64> = points.iter().copied().map(Point::from).collect();
    multi
        .centroid()
        .map(|point| point.0)
        .ok_or(GeoError::EmptyInput)
}

/// Total length of the polyline through `points`, in kilometres.
///
/// Fewer than two points yield `0.0`.
#[must_use]
pub fn path_length_km(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|leg| match leg {
            [from, to] => haversine_km(*from, *to),
            _ => 0.0,
        })
        .sum()
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "tests compare distances within a tolerance"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE_KM: f64 = 1e-9;

    #[rstest]
    #[case(coordinate(40.70, -74.00), coordinate(40.80, -73.90))]
    #[case(coordinate(-33.86, 151.21), coordinate(51.51, -0.13))]
    fn distance_is_symmetric(#[case] a: Coordinate, #[case] b: Coordinate) {
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < TOLERANCE_KM);
    }

    #[rstest]
    fn distance_to_self_is_zero() {
        let a = coordinate(40.7128, -74.006);
        assert!(haversine_km(a, a).abs() < TOLERANCE_KM);
    }

    #[rstest]
    fn one_degree_of_latitude_is_about_111_km() {
        let km = haversine_km(coordinate(10.0, 20.0), coordinate(11.0, 20.0));
        assert!((km - 111.195).abs() < 0.01, "got {km}");
    }

    #[rstest]
    fn triangle_inequality_holds_for_nearby_points() {
        let a = coordinate(40.70, -74.00);
        let b = coordinate(40.71, -74.01);
        let c = coordinate(40.72, -73.99);
        assert!(haversine_km(a, c) <= haversine_km(a, b) + haversine_km(b, c) + TOLERANCE_KM);
    }

    #[rstest]
    fn centroid_averages_components_independently() {
        let mid = centroid(&[
            coordinate(40.0, -74.0),
            coordinate(41.0, -73.0),
            coordinate(42.0, -75.0),
        ])
        .expect("non-empty input");
        assert!((mid.y - 41.0).abs() < 1e-12);
        assert!((mid.x + 74.0).abs() < 1e-12);
    }

    #[rstest]
    fn centroid_of_single_point_is_that_point() {
        let p = coordinate(12.5, 3.25);
        assert_eq!(centroid(&[p]), Ok(p));
    }

    #[rstest]
    fn centroid_rejects_empty_input() {
        assert_eq!(centroid(&[]), Err(GeoError::EmptyInput));
    }

    #[rstest]
    #[case(Vec::new())]
    #[case(vec![coordinate(1.0, 1.0)])]
    fn short_paths_have_zero_length(#[case] points: Vec<Coordinate>) {
        assert!(path_length_km(&points).abs() < TOLERANCE_KM);
    }

    #[rstest]
    fn path_length_sums_legs() {
        let a = coordinate(0.0, 0.0);
        let b = coordinate(0.0, 1.0);
        let c = coordinate(1.0, 1.0);
        let expected = haversine_km(a, b) + haversine_km(b, c);
        assert!((path_length_km(&[a, b, c]) - expected).abs() < TOLERANCE_KM);
    }
}
