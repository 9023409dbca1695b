//! Seeded uniform generator of requests and vehicles.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rideshare_core::{Bounds, Coordinate, DataAdapter, RideRequest, Vehicle, coordinate};

/// Kilometres per degree of latitude on the haversine sphere.
const KM_PER_DEGREE: f64 = 111.195;

const REQUEST_STREAM: u64 = 0x7265_7175;
const VEHICLE_STREAM: u64 = 0x7665_6869;

/// Configuration for [`UniformDataAdapter`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformDataAdapterConfig {
    /// Seed shared by every generation call.
    pub seed: u64,
    /// Seats on every generated vehicle. Zero is treated as one.
    pub vehicle_capacity: u32,
    /// Request timestamps are spread uniformly over this many minutes from
    /// the start of the simulation clock.
    pub time_spread_minutes: u32,
    /// Vehicles placed near requests lie within this distance of a pickup,
    /// per axis, in kilometres.
    pub near_radius_km: f64,
}

impl Default for UniformDataAdapterConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            vehicle_capacity: 4,
            time_spread_minutes: 10,
            near_radius_km: 1.0,
        }
    }
}

/// [`DataAdapter`] drawing positions uniformly inside the bounds.
///
/// Every call reseeds its generator, so equal configurations always produce
/// equal scenarios. Requests and vehicles use independent streams.
///
/// # Examples
/// ```
/// use rideshare_core::{Bounds, DataAdapter, coordinate};
/// use rideshare_sim::UniformDataAdapter;
///
/// let bounds = Bounds::new(coordinate(40.70, -74.02), coordinate(40.80, -73.93));
/// let adapter = UniformDataAdapter::default();
/// let requests = adapter.generate_requests(5, &bounds);
/// assert_eq!(requests.len(), 5);
/// assert_eq!(requests, adapter.generate_requests(5, &bounds));
/// ```
#[derive(Debug, Clone, Default)]
pub struct UniformDataAdapter {
    config: UniformDataAdapterConfig,
}

impl UniformDataAdapter {
    /// Construct an adapter with explicit configuration.
    #[must_use]
    pub const fn new(config: UniformDataAdapterConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &UniformDataAdapterConfig {
        &self.config
    }

    fn rng(&self, stream: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.config.seed ^ stream)
    }

    fn vehicle(&self, id: u64, location: Coordinate) -> Option<Vehicle> {
        match Vehicle::new(id, location, self.config.vehicle_capacity.max(1)) {
            Ok(vehicle) => Some(vehicle),
            Err(err) => {
                log::warn!("skipping generated vehicle: {err}");
                debug_assert!(false, "generated capacity is never zero");
                None
            }
        }
    }
}

impl DataAdapter for UniformDataAdapter {
    fn generate_requests(&self, count: usize, bounds: &Bounds) -> Vec<RideRequest> {
        let mut rng = self.rng(REQUEST_STREAM);
        let spread_ms = u64::from(self.config.time_spread_minutes) * 60_000;
        (0_u64..)
            .take(count)
            .map(|id| {
                let pickup = uniform_in(&mut rng, bounds);
                let dropoff = uniform_in(&mut rng, bounds);
                let timestamp_ms = rng.gen_range(0..=spread_ms);
                RideRequest::new(id, pickup, dropoff, timestamp_ms)
            })
            .collect()
    }

    fn generate_vehicles(&self, count: usize, bounds: &Bounds) -> Vec<Vehicle> {
        let mut rng = self.rng(VEHICLE_STREAM);
        (0_u64..)
            .take(count)
            .filter_map(|id| self.vehicle(id, uniform_in(&mut rng, bounds)))
            .collect()
    }

    fn generate_vehicles_near(
        &self,
        count: usize,
        requests: &[RideRequest],
        bounds: &Bounds,
    ) -> Vec<Vehicle> {
        if requests.is_empty() {
            return self.generate_vehicles(count, bounds);
        }
        let mut rng = self.rng(VEHICLE_STREAM);
        (0_u64..)
            .take(count)
            .filter_map(|id| {
                let anchor = requests.choose(&mut rng).map(|r| r.pickup)?;
                let location = jitter(&mut rng, anchor, self.config.near_radius_km, bounds);
                self.vehicle(id, location)
            })
            .collect()
    }
}

fn uniform_in<R: Rng + ?Sized>(rng: &mut R, bounds: &Bounds) -> Coordinate {
    let (min, max) = (bounds.min(), bounds.max());
    coordinate(
        rng.gen_range(min.y..=max.y),
        rng.gen_range(min.x..=max.x),
    )
}

/// A point within `radius_km` of `anchor` on each axis, clamped into `bounds`.
#[expect(
    clippy::float_arithmetic,
    reason = "converts a kilometre radius into degree offsets"
)]
fn jitter<R: Rng + ?Sized>(
    rng: &mut R,
    anchor: Coordinate,
    radius_km: f64,
    bounds: &Bounds,
) -> Coordinate {
    let radius = if radius_km.is_finite() { radius_km.abs() } else { 0.0 };
    let dlat = radius / KM_PER_DEGREE;
    let dlng = dlat / anchor.y.to_radians().cos().abs().max(0.01);
    let lat = anchor.y + rng.gen_range(-1.0..=1.0) * dlat;
    let lng = anchor.x + rng.gen_range(-1.0..=1.0) * dlng;
    let (min, max) = (bounds.min(), bounds.max());
    coordinate(lat.clamp(min.y, max.y), lng.clamp(min.x, max.x))
}
