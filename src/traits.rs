//! Seams to the external collaborators of the rescheduling core.
//!
//! The routing oracle and capacity checker live outside this crate; the
//! evaluator only ever talks to them through these traits so tests can swap
//! in deterministic in-memory versions.

use crate::LatLng;
use crate::extract::UnroutedRequest;
use crate::feasibility::InsertionCandidate;
use crate::schedule::RouteSlice;

/// Summary of a driving route through an ordered list of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    /// Driving duration in seconds.
    pub duration_secs: f64,
    /// Driving distance in meters.
    pub distance_meters: f64,
}

/// Computes the minimal driving path visiting 2–3 points in order.
///
/// Returns `None` when no route exists or the oracle could not be reached.
pub trait RoutingOracle: Send + Sync {
    fn route(&self, points: &[LatLng]) -> Option<RouteSummary>;
}

impl<T: RoutingOracle + ?Sized> RoutingOracle for &T {
    fn route(&self, points: &[LatLng]) -> Option<RouteSummary> {
        (**self).route(points)
    }
}

impl<T: RoutingOracle + ?Sized> RoutingOracle for Box<T> {
    fn route(&self, points: &[LatLng]) -> Option<RouteSummary> {
        (**self).route(points)
    }
}

/// Confirms a candidate insertion keeps the target run within its seat and
/// wheelchair capacity at every stop between the insertion points.
pub trait CapacityChecker: Send + Sync {
    fn approves(
        &self,
        route: &RouteSlice<'_>,
        candidate: &InsertionCandidate,
        request: &UnroutedRequest,
    ) -> bool;
}

/// Accepts every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedCapacity;

impl CapacityChecker for UnlimitedCapacity {
    fn approves(&self, _: &RouteSlice<'_>, _: &InsertionCandidate, _: &UnroutedRequest) -> bool {
        true
    }
}
