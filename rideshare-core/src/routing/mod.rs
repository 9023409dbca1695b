//! Turn assignment waypoints into drivable routes.
//!
//! The [`RoutingEngine`] trait abstracts whatever produces concrete routes:
//! a road-network service, a precomputed table, or the straight-line
//! baseline that echoes its input. Engines also own the notion of leg
//! distance used when measuring routed tours.
//!
//! Errors are returned when inputs are unusable, e.g. an empty waypoint list.

mod engine;
mod error;

pub use engine::RoutingEngine;
pub use error::RoutingError;
