//! Groups of ride requests eligible to share a vehicle.

use crate::{Coordinate, GeoError, RideRequest, centroid};

/// Ride requests that can be served together.
///
/// A cluster is never empty and its centroid is the mean of the member
/// pickups. Clusters are immutable once a [`Clusterer`] has produced them.
///
/// # Examples
/// ```
/// use rideshare_core::{Cluster, RideRequest, coordinate};
///
/// # fn main() -> Result<(), rideshare_core::GeoError> {
/// let a = RideRequest::new(1, coordinate(0.0, 0.0), coordinate(1.0, 1.0), 0);
/// let b = RideRequest::new(2, coordinate(2.0, 2.0), coordinate(1.0, 1.0), 0);
/// let cluster = Cluster::from_requests(0, vec![a, b])?;
/// assert_eq!(cluster.size(), 2);
/// assert_eq!(cluster.centroid, coordinate(1.0, 1.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    /// Unique identifier within a run.
    pub id: u64,
    /// Mean of the member pickup locations.
    pub centroid: Coordinate,
    /// Members in discovery order.
    pub requests: Vec<RideRequest>,
}

impl Cluster {
    /// Build a cluster from its members, computing the pickup centroid.
    ///
    /// # Errors
    /// Returns [`GeoError::EmptyInput`] when `requests` is empty.
    pub fn from_requests(id: u64, requests: Vec<RideRequest>) -> Result<Self, GeoError> {
        let pickups: Vec<Coordinate> = requests.iter().map(|r| r.pickup).collect();
        let centroid = centroid(&pickups)?;
        Ok(Self {
            id,
            centroid,
            requests,
        })
    }

    /// Build a one-member cluster centred on the request's pickup.
    #[must_use]
    pub fn singleton(id: u64, request: RideRequest) -> Self {
        Self {
            id,
            centroid: request.pickup,
            requests: vec![request],
        }
    }

    /// Number of passengers in the cluster.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.requests.len()
    }

    /// Identifiers of the members, in order.
    pub fn request_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.requests.iter().map(|r| r.id)
    }
}

/// Inputs controlling a clustering pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterParams {
    /// Requests further than this from `now_ms` are ignored.
    pub time_window_minutes: f64,
    /// Caller's notion of "close enough" pickups, in kilometres.
    pub max_distance_km: f64,
    /// Reference instant for the time window, in milliseconds.
    pub now_ms: u64,
}

/// Partition ride requests into shareable groups.
///
/// Implementations must place every request that falls inside the time window
/// in exactly one returned cluster and must drop every other request. Empty
/// input yields an empty result.
///
/// # Examples
///
/// ```rust
/// use rideshare_core::{Cluster, ClusterParams, Clusterer, RideRequest, coordinate};
///
/// struct EachAlone;
///
/// impl Clusterer for EachAlone {
///     fn cluster(&self, requests: &[RideRequest], _params: &ClusterParams) -> Vec<Cluster> {
///         requests
///             .iter()
///             .zip(0_u64..)
///             .map(|(r, id)| Cluster::singleton(id, r.clone()))
///             .collect()
///     }
/// }
///
/// let origin = coordinate(0.0, 0.0);
/// let params = ClusterParams { time_window_minutes: 30.0, max_distance_km: 2.0, now_ms: 0 };
/// let clusters = EachAlone.cluster(&[RideRequest::new(1, origin, origin, 0)], &params);
/// assert_eq!(clusters.len(), 1);
/// ```
pub trait Clusterer: Send + Sync {
    /// Group `requests` according to `params`.
    fn cluster(&self, requests: &[RideRequest], params: &ClusterParams) -> Vec<Cluster>;
}
