//! Spatio-temporal clustering of ride requests.
//!
//! [`SpatioTemporalClusterer`] implements the
//! [`Clusterer`](rideshare_core::Clusterer) trait with a DBSCAN variant over a
//! combined distance that blends pickup proximity with submission-time
//! proximity. Both components are normalised into `[0, 1]` so the neighbourhood
//! threshold is unit-free. Requests the density search cannot group are
//! returned as singleton clusters, so every request inside the time window
//! ends up in exactly one cluster.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod clusterer;
mod dbscan;
mod distance;

pub use clusterer::{ClustererConfig, EpsilonPolicy, SpatioTemporalClusterer};
