//! Insertion feasibility for one request on one candidate run.
//!
//! The pickup is placed first: the cheapest detour out of the run and back
//! around the stops whose windows overlap the pickup window. The run is then
//! lagged by the resulting delay and the dropoff is placed the same way, at
//! or after the pickup's return stop. Lateness is counted against the
//! run's own lateness before the insertion.

use serde::Serialize;

use crate::LatLng;
use crate::config::RerouteConfig;
use crate::extract::{Leg, UnroutedRequest};
use crate::overlap::{WindowOverlapSets, overlapping_window};
use crate::routing::{RoutingClient, argmin};
use crate::schedule::{RouteSlice, RouteStop};
use crate::traits::RoutingOracle;

/// Late passenger stops and how late they are in total, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatenessSummary {
    pub late_windows: usize,
    pub total_lateness: i64,
}

impl LatenessSummary {
    /// Score passenger stops with every ETA pushed back by `lag`.
    /// Depot and non-passenger stops never count.
    pub fn of<'s, 'a: 's, I>(stops: I, lag: i64) -> Self
    where
        I: IntoIterator<Item = &'s RouteStop<'a>>,
    {
        stops
            .into_iter()
            .filter(|stop| stop.record.activity.is_passenger())
            .fold(Self::default(), |mut summary, stop| {
                let late_by = stop.eta + lag - stop.record.window_bound();
                if late_by > 0 {
                    summary.late_windows += 1;
                    summary.total_lateness += late_by;
                }
                summary
            })
    }

    fn plus(self, other: Self) -> Self {
        Self {
            late_windows: self.late_windows + other.late_windows,
            total_lateness: self.total_lateness + other.total_lateness,
        }
    }
}

/// Lateness of `route` as scheduled, from `from_position` onward.
pub fn original_lateness(route: &RouteSlice<'_>, from_position: usize) -> LatenessSummary {
    LatenessSummary::of(route.stops_from(from_position), 0)
}

/// Cheapest way found to fit one request into one run.
///
/// Positions are schedule positions of the version the candidate was
/// evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertionCandidate {
    pub run: String,
    pub pickup_leave: usize,
    pub pickup_return: usize,
    pub dropoff_leave: usize,
    pub dropoff_return: usize,
    /// Delay pushed onto the run by the pickup detour, in seconds.
    pub pickup_lag: i64,
    /// Delay at the dropoff return stop once both detours are driven.
    pub total_lag: i64,
    /// Both detours plus the fixed overhead, in seconds.
    pub additional_time: i64,
    pub additional_broken_windows: usize,
    pub additional_lateness: i64,
    /// First position of the run, for converting positions to stop numbers.
    pub min_run_position: usize,
}

impl InsertionCandidate {
    /// Stop numbers on the run after which the passenger is picked up and
    /// dropped off.
    pub fn stop_numbers(&self) -> (usize, usize) {
        (
            self.pickup_leave - self.min_run_position,
            self.dropoff_leave - self.min_run_position,
        )
    }
}

struct Detour {
    leave: usize,
    back: usize,
    seconds: i64,
}

/// Query every (leave, return) pair and keep the shortest round trip through
/// `location`. Pairs whose stops are not on `route` are skipped.
fn best_detour<R: RoutingOracle>(
    route: &RouteSlice<'_>,
    pairs: impl Iterator<Item = (usize, usize)>,
    location: LatLng,
    client: &RoutingClient<R>,
) -> Option<Detour> {
    let (positions, coords): (Vec<(usize, usize)>, Vec<(LatLng, LatLng)>) = pairs
        .filter_map(|(leave, back)| {
            let from = route.stop(leave)?.record.location();
            let to = route.stop(back)?.record.location();
            Some(((leave, back), (from, to)))
        })
        .unzip();

    let times = client.detour_times(location, &coords);
    let best = argmin(&times)?;
    let (leave, back) = positions[best];
    Some(Detour {
        leave,
        back,
        seconds: times[best],
    })
}

/// Dropoff (leave, return) pairs at or after the pickup's return stop.
///
/// Returns are strictly after `pickup_back`. A leave and return on the same
/// stop is never paired. Empty when the dropoff cannot follow the pickup.
fn dropoff_pairs(sets: &WindowOverlapSets, pickup_back: usize) -> Vec<(usize, usize)> {
    let outbound: Vec<usize> = sets
        .outbound
        .iter()
        .copied()
        .filter(|&position| position >= pickup_back)
        .collect();
    let mut inbound: Vec<usize> = sets
        .inbound
        .iter()
        .copied()
        .filter(|&position| position > pickup_back)
        .collect();

    if outbound.is_empty() || inbound.is_empty() {
        return Vec::new();
    }
    if outbound[0] == inbound[0] {
        inbound.remove(0);
    }
    outbound.into_iter().zip(inbound).collect()
}

/// Delay at `back` after leaving `leave` (ETA as given on `leave_route`),
/// dwelling, and driving `detour` seconds. Never negative.
fn lag_at(
    leave_route: &RouteSlice<'_>,
    route: &RouteSlice<'_>,
    detour: &Detour,
    dwell: i64,
) -> Option<i64> {
    let leave_eta = leave_route.stop(detour.leave)?.eta;
    let back_eta = route.stop(detour.back)?.eta;
    Some((leave_eta + dwell + detour.seconds - back_eta).max(0))
}

/// Evaluate inserting `request` into `route`. `None` means the run cannot
/// take the request.
pub fn evaluate<R: RoutingOracle>(
    route: &RouteSlice<'_>,
    request: &UnroutedRequest,
    client: &RoutingClient<R>,
    config: &RerouteConfig,
) -> Option<InsertionCandidate> {
    let min_run_position = route.first_position()?;
    let dwell = config.dwell_seconds;

    let pickup_sets = overlapping_window(route.records(), request.window(Leg::Pickup));
    let Some(pickup) = best_detour(route, pickup_sets.pairs(), request.location(Leg::Pickup), client) else {
        tracing::debug!(run = %route.run, booking_id = request.booking_id, "no pickup window overlap");
        return None;
    };
    let pickup_lag = lag_at(route, route, &pickup, dwell)?;

    let lagged = route.lagged(pickup_lag);
    let dropoff_sets = overlapping_window(lagged.records(), request.window(Leg::Dropoff));
    let pairs = dropoff_pairs(&dropoff_sets, pickup.back);
    if pairs.is_empty() {
        tracing::debug!(run = %route.run, booking_id = request.booking_id, "no dropoff after pickup");
        return None;
    }

    let Some(dropoff) = best_detour(&lagged, pairs.into_iter(), request.location(Leg::Dropoff), client) else {
        tracing::debug!(run = %route.run, booking_id = request.booking_id, "no routable dropoff pair");
        return None;
    };
    let total_lag = lag_at(&lagged, route, &dropoff, dwell)?;

    let between = route
        .stops_from(pickup.back)
        .iter()
        .take_while(|stop| stop.position < dropoff.back);
    let after = route.stops_from(dropoff.back);
    let inserted = LatenessSummary::of(between, pickup_lag).plus(LatenessSummary::of(after, total_lag));
    let baseline = original_lateness(route, pickup.back);

    let candidate = InsertionCandidate {
        run: route.run.clone(),
        pickup_leave: pickup.leave,
        pickup_return: pickup.back,
        dropoff_leave: dropoff.leave,
        dropoff_return: dropoff.back,
        pickup_lag,
        total_lag,
        additional_time: pickup.seconds + dropoff.seconds + config.detour_overhead_seconds,
        additional_broken_windows: inserted.late_windows.saturating_sub(baseline.late_windows),
        additional_lateness: (inserted.total_lateness - baseline.total_lateness).max(0),
        min_run_position,
    };

    tracing::debug!(
        run = %candidate.run,
        booking_id = request.booking_id,
        pickup_lag,
        additional_time = candidate.additional_time,
        broken = candidate.additional_broken_windows,
        "insertion evaluated"
    );
    Some(candidate)
}
