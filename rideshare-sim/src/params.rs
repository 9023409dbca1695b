//! Inputs of a simulation run.

use rideshare_core::{Bounds, coordinate};

/// Detour limit used when the caller supplies an unusable value, in km.
pub const DEFAULT_MAX_DETOUR_KM: f64 = 5.0;

/// Time window used when the caller supplies an unusable value, in minutes.
pub const DEFAULT_TIME_WINDOW_MINUTES: f64 = 30.0;

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationParams {
    /// Ride requests to generate.
    pub passenger_count: usize,
    /// Vehicles to generate.
    pub vehicle_count: usize,
    /// Furthest a vehicle may travel to a cluster, in kilometres.
    pub max_detour_km: f64,
    /// Requests older than this relative to `now_ms` are ignored.
    pub time_window_minutes: f64,
    /// Area in which requests and vehicles are generated.
    pub bounds: Bounds,
    /// Place vehicles near request pickups instead of uniformly.
    pub vehicles_near_requests: bool,
    /// Reference instant; defaults to the latest request timestamp.
    pub now_ms: Option<u64>,
}

impl SimulationParams {
    /// The detour limit, falling back to [`DEFAULT_MAX_DETOUR_KM`] when the
    /// configured value is not a positive finite number.
    #[must_use]
    pub fn effective_max_detour_km(&self) -> f64 {
        positive_or(self.max_detour_km, DEFAULT_MAX_DETOUR_KM)
    }

    /// The time window, falling back to [`DEFAULT_TIME_WINDOW_MINUTES`] when
    /// the configured value is not a positive finite number.
    #[must_use]
    pub fn effective_time_window_minutes(&self) -> f64 {
        positive_or(self.time_window_minutes, DEFAULT_TIME_WINDOW_MINUTES)
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            passenger_count: 50,
            vehicle_count: 10,
            max_detour_km: DEFAULT_MAX_DETOUR_KM,
            time_window_minutes: DEFAULT_TIME_WINDOW_MINUTES,
            bounds: Bounds::new(coordinate(40.70, -74.02), coordinate(40.80, -73.93)),
            vehicles_near_requests: true,
            now_ms: None,
        }
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
