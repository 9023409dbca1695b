//! `SpatioTemporalClusterer`: DBSCAN over pickup location and request time.

use std::collections::HashSet;
use std::sync::Arc;

use rideshare_core::{
    Cluster, ClusterParams, Clusterer, LogObserver, RideRequest, SearchEvent, SearchObserver,
    minutes_between,
};

use crate::dbscan::{Dbscan, Partition};
use crate::distance::CombinedDistance;

/// How the neighbourhood threshold is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EpsilonPolicy {
    /// Grow epsilon slowly with the number of requests considered:
    /// `min(base + growth * log10(n), max)`.
    Adaptive {
        /// Threshold for a single request.
        base: f64,
        /// Increase per decade of requests.
        growth: f64,
        /// Upper bound.
        max: f64,
    },
    /// Use the same threshold regardless of input size.
    Fixed(f64),
}

impl EpsilonPolicy {
    /// Threshold to use when clustering `considered` requests.
    ///
    /// # Examples
    /// ```
    /// use rideshare_cluster::EpsilonPolicy;
    ///
    /// let policy = EpsilonPolicy::default();
    /// assert!((policy.epsilon_for(1) - 0.25).abs() < 1e-12);
    /// assert!((policy.epsilon_for(100) - 0.35).abs() < 1e-12);
    /// assert!((policy.epsilon_for(1_000_000) - 0.35).abs() < 1e-12);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "adaptive epsilon grows logarithmically with the request count"
    )]
    pub fn epsilon_for(&self, considered: usize) -> f64 {
        match *self {
            Self::Fixed(epsilon) => epsilon,
            Self::Adaptive { base, growth, max } => {
                let decades = (considered.max(1) as f64).log10();
                (base + growth * decades).min(max)
            }
        }
    }
}

impl Default for EpsilonPolicy {
    fn default() -> Self {
        Self::Adaptive {
            base: 0.25,
            growth: 0.05,
            max: 0.35,
        }
    }
}

/// Configuration for [`SpatioTemporalClusterer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClustererConfig {
    /// Largest pickup separation that still counts as partially close, in
    /// kilometres.
    pub spatial_cap_km: f64,
    /// Largest time difference that still counts as partially close, in
    /// minutes.
    pub temporal_cap_minutes: f64,
    /// Weight of the spatial component.
    pub spatial_weight: f64,
    /// Weight of the temporal component.
    pub temporal_weight: f64,
    /// Neighbours, the point included, required for a core point.
    pub min_points: usize,
    /// Neighbourhood threshold.
    pub epsilon: EpsilonPolicy,
}

impl Default for ClustererConfig {
    fn default() -> Self {
        Self {
            spatial_cap_km: 3.0,
            temporal_cap_minutes: 30.0,
            spatial_weight: 0.75,
            temporal_weight: 0.25,
            min_points: 2,
            epsilon: EpsilonPolicy::default(),
        }
    }
}

/// DBSCAN clusterer over a blend of pickup distance and request time.
///
/// # Examples
/// ```
/// use rideshare_cluster::SpatioTemporalClusterer;
/// use rideshare_core::{ClusterParams, Clusterer, RideRequest, coordinate};
///
/// let a = RideRequest::new(1, coordinate(40.7128, -74.0060), coordinate(40.75, -73.98), 0);
/// let b = RideRequest::new(2, coordinate(40.7129, -74.0061), coordinate(40.76, -73.97), 60_000);
/// let params = ClusterParams { time_window_minutes: 30.0, max_distance_km: 2.0, now_ms: 60_000 };
///
/// let clusters = SpatioTemporalClusterer::new().cluster(&[a, b], &params);
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].size(), 2);
/// ```
#[derive(Clone)]
pub struct SpatioTemporalClusterer {
    config: ClustererConfig,
    observer: Arc<dyn SearchObserver>,
}

impl SpatioTemporalClusterer {
    /// Construct a clusterer with default configuration that logs its
    /// progress through [`LogObserver`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClustererConfig::default())
    }

    /// Construct a clusterer with explicit configuration.
    #[must_use]
    pub fn with_config(config: ClustererConfig) -> Self {
        Self {
            config,
            observer: Arc::new(LogObserver),
        }
    }

    /// Replace the observability sink.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClustererConfig {
        &self.config
    }
}

impl Default for SpatioTemporalClusterer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SpatioTemporalClusterer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatioTemporalClusterer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Clusterer for SpatioTemporalClusterer {
    fn cluster(&self, requests: &[RideRequest], params: &ClusterParams) -> Vec<Cluster> {
        let recent: Vec<&RideRequest> = requests
            .iter()
            .filter(|r| {
                minutes_between(params.now_ms, r.timestamp_ms) <= params.time_window_minutes
            })
            .collect();

        let metric = CombinedDistance::new(&self.config, params.max_distance_km);
        let epsilon = self.config.epsilon.epsilon_for(recent.len());
        let dbscan = Dbscan {
            epsilon,
            min_points: self.config.min_points,
        };
        let partition = dbscan.run(recent.len(), |a, b| match (recent.get(a), recent.get(b)) {
            (Some(x), Some(y)) => metric.between(x, y),
            _ => f64::INFINITY,
        });

        let clusters = assemble(&recent, &partition);
        let grouped = clusters.iter().filter(|c| c.size() > 1).count();
        self.observer.on_event(&SearchEvent::ClusteringFinished {
            considered: recent.len(),
            clusters: grouped,
            noise: clusters.len() - grouped,
            epsilon,
        });
        clusters
    }
}

/// Turn a partition over `recent` into clusters with sequential ids.
///
/// Dense groups come first in discovery order, then noise in input order.
/// Any request the partition failed to account for is appended as a
/// singleton.
fn assemble(recent: &[&RideRequest], partition: &Partition) -> Vec<Cluster> {
    let mut clusters = Vec::with_capacity(partition.clusters.len() + partition.noise.len());
    let mut placed: HashSet<usize> = HashSet::with_capacity(recent.len());
    let mut next_id = 0_u64;

    for members in &partition.clusters {
        let group: Vec<RideRequest> = members
            .iter()
            .filter(|index| placed.insert(**index))
            .filter_map(|index| recent.get(*index).map(|r| (*r).clone()))
            .collect();
        match Cluster::from_requests(next_id, group) {
            Ok(cluster) => {
                clusters.push(cluster);
                next_id += 1;
            }
            Err(err) => {
                log::warn!("dropping empty dense group during clustering: {err}");
                debug_assert!(false, "dense groups always have members");
            }
        }
    }

    for index in &partition.noise {
        if let Some(request) = recent.get(*index)
            && placed.insert(*index)
        {
            clusters.push(Cluster::singleton(next_id, (*request).clone()));
            next_id += 1;
        }
    }

    for (index, request) in recent.iter().enumerate() {
        if placed.insert(index) {
            log::warn!(
                "request {} was not reached by clustering; emitting it alone",
                request.id
            );
            debug_assert!(false, "partition must cover every request");
            clusters.push(Cluster::singleton(next_id, (*request).clone()));
            next_id += 1;
        }
    }

    clusters
}

#[cfg(test)]
mod tests;
