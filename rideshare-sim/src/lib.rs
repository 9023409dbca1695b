//! End-to-end simulation of pooled ride matching.
//!
//! [`SimulationOrchestrator`] sequences the pipeline: a
//! [`DataAdapter`](rideshare_core::DataAdapter) generates demand and supply,
//! a [`Clusterer`](rideshare_core::Clusterer) groups the requests, a
//! [`Matcher`](rideshare_core::Matcher) assigns clusters to vehicles, and a
//! [`RoutingEngine`](rideshare_core::RoutingEngine) turns every assignment into
//! a concrete route. [`Metrics`] then compare the routed tours with a
//! sequential one-passenger-at-a-time baseline.
//!
//! The crate also ships the baseline collaborators used by the command-line
//! tool: [`StraightLineRouter`] and the seeded [`UniformDataAdapter`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adapter;
mod error;
mod metrics;
mod orchestrator;
mod params;
mod router;

pub use adapter::{UniformDataAdapter, UniformDataAdapterConfig};
pub use error::SimulationError;
pub use metrics::Metrics;
pub use orchestrator::{SimulationOrchestrator, SimulationResult};
pub use params::{DEFAULT_MAX_DETOUR_KM, DEFAULT_TIME_WINDOW_MINUTES, SimulationParams};
pub use router::StraightLineRouter;
