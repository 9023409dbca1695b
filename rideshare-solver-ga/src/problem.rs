//! Read-only view of one matching instance.

use rideshare_core::{Cluster, Coordinate, Vehicle, haversine_km};

/// Clusters, vehicles and the precomputed vehicle-to-centroid distances.
#[derive(Debug)]
pub(crate) struct Problem<'a> {
    clusters: &'a [Cluster],
    vehicles: &'a [Vehicle],
    max_detour_km: f64,
    /// `reach[cluster][vehicle]`, in kilometres.
    reach: Vec<Vec<f64>>,
    total_requests: usize,
}

impl<'a> Problem<'a> {
    pub(crate) fn new(
        clusters: &'a [Cluster],
        vehicles: &'a [Vehicle],
        max_detour_km: f64,
    ) -> Self {
        let reach = clusters
            .iter()
            .map(|cluster| {
                vehicles
                    .iter()
                    .map(|vehicle| haversine_km(vehicle.location, cluster.centroid))
                    .collect()
            })
            .collect();
        Self {
            clusters,
            vehicles,
            max_detour_km,
            reach,
            total_requests: clusters.iter().map(Cluster::size).sum(),
        }
    }

    pub(crate) const fn clusters(&self) -> &'a [Cluster] {
        self.clusters
    }

    pub(crate) const fn vehicles(&self) -> &'a [Vehicle] {
        self.vehicles
    }

    pub(crate) const fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub(crate) const fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub(crate) const fn max_detour_km(&self) -> f64 {
        self.max_detour_km
    }

    pub(crate) const fn total_requests(&self) -> usize {
        self.total_requests
    }

    /// Passengers in `cluster`, or zero for an unknown index.
    pub(crate) fn size(&self, cluster: usize) -> usize {
        self.clusters.get(cluster).map_or(0, Cluster::size)
    }

    /// Distance from `vehicle` to the centroid of `cluster`.
    pub(crate) fn reach(&self, cluster: usize, vehicle: usize) -> f64 {
        self.reach
            .get(cluster)
            .and_then(|row| row.get(vehicle))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Whether `vehicle` may serve `cluster` with the detour limit scaled by
    /// `factor`.
    #[expect(clippy::float_arithmetic, reason = "relaxation scales the detour limit")]
    pub(crate) fn within_detour(&self, cluster: usize, vehicle: usize, factor: f64) -> bool {
        self.reach(cluster, vehicle) <= self.max_detour_km * factor
    }

    /// Waypoints for `vehicle` serving `clusters`: its location, every pickup,
    /// then every dropoff.
    pub(crate) fn route(&self, vehicle: usize, clusters: &[usize]) -> Vec<Coordinate> {
        let Some(start) = self.vehicles.get(vehicle).map(|v| v.location) else {
            return Vec::new();
        };
        let members: Vec<_> = clusters
            .iter()
            .filter_map(|index| self.clusters.get(*index))
            .flat_map(|cluster| cluster.requests.iter())
            .collect();
        let mut route = Vec::with_capacity(1 + 2 * members.len());
        route.push(start);
        route.extend(members.iter().map(|r| r.pickup));
        route.extend(members.iter().map(|r| r.dropoff));
        route
    }
}

/// Convert a count to `f64` without a lossy cast.
pub(crate) fn count_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

/// `fraction` of `count`, rounded and clamped to `0..=count`.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "rounded share of a small population"
)]
pub(crate) fn share_of(count: usize, fraction: f64) -> usize {
    if fraction.is_nan() || fraction <= 0.0 {
        return 0;
    }
    let share = (count_f64(count) * fraction.min(1.0)).round();
    (share as usize).min(count)
}
