//! paratransit-reroute core
//!
//! Reassigns ride requests stranded by a broken vehicle run (or flagged by a
//! dispatcher) onto other runs of the day schedule, and compares each bus
//! insertion against taxi and new-vehicle fallbacks.

pub mod traits;
pub mod error;
pub mod config;
pub mod time;
pub mod haversine;
pub mod osrm;
pub mod schedule;
pub mod overlap;
pub mod extract;
pub mod routing;
pub mod candidates;
pub mod feasibility;
pub mod cost;
pub mod mutate;
pub mod options;

/// A (latitude, longitude) pair in degrees.
pub type LatLng = (f64, f64);
