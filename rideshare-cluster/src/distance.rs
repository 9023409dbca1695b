//! Combined spatial and temporal distance between two requests.

use rideshare_core::{RideRequest, haversine_km, minutes_between};

use crate::ClustererConfig;

/// Weighted blend of normalised pickup distance and time difference.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CombinedDistance {
    spatial_scale_km: f64,
    temporal_cap_minutes: f64,
    spatial_weight: f64,
    temporal_weight: f64,
}

impl CombinedDistance {
    /// Build the metric for one clustering pass.
    ///
    /// The spatial scale is the smaller of the configured cap and the caller's
    /// `max_distance_km`; unusable caller values fall back to the cap.
    pub(crate) fn new(config: &ClustererConfig, max_distance_km: f64) -> Self {
        let spatial_scale_km = if max_distance_km.is_finite() && max_distance_km > 0.0 {
            max_distance_km.min(config.spatial_cap_km)
        } else {
            config.spatial_cap_km
        };
        Self {
            spatial_scale_km,
            temporal_cap_minutes: config.temporal_cap_minutes,
            spatial_weight: config.spatial_weight,
            temporal_weight: config.temporal_weight,
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "the combined distance is a weighted sum of normalised components"
    )]
    pub(crate) fn between(&self, a: &RideRequest, b: &RideRequest) -> f64 {
        let spatial = normalise(haversine_km(a.pickup, b.pickup), self.spatial_scale_km);
        let temporal = normalise(
            minutes_between(a.timestamp_ms, b.timestamp_ms),
            self.temporal_cap_minutes,
        );
        self.spatial_weight * spatial + self.temporal_weight * temporal
    }
}

/// Scale `value` by `cap` and clamp the result to `1.0`.
///
/// A non-positive cap saturates every non-zero value.
#[expect(clippy::float_arithmetic, reason = "normalisation divides by the cap")]
fn normalise(value: f64, cap: f64) -> f64 {
    if cap > 0.0 {
        (value / cap).min(1.0)
    } else if value > 0.0 {
        1.0
    } else {
        0.0
    }
}
