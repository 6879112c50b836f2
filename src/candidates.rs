//! Narrowing the fleet to runs worth evaluating for a request.

use crate::extract::{Leg, UnroutedRequest};
use crate::haversine::{RadiusPolicy, haversine_miles};
use crate::overlap::overlapping_window;
use crate::schedule::DaySchedule;

/// Runs with a stop near the request's pickup whose window overlaps the
/// pickup window. The request's own run is never included.
///
/// The radius narrows until at most `policy.max_matches` distinct runs remain;
/// if it cannot get there the request has no nearby candidates.
pub fn nearby_runs(schedule: &DaySchedule, request: &UnroutedRequest, policy: &RadiusPolicy) -> Vec<String> {
    let others = schedule
        .iter()
        .filter(|(_, _, record)| record.run != request.origin_run)
        .map(|(position, _, record)| (position, record));
    let sets = overlapping_window(others, request.window(Leg::Pickup));
    let pickup = request.location(Leg::Pickup);

    let nodes: Vec<(&str, f64)> = sets
        .all_nodes
        .iter()
        .filter_map(|&position| schedule.at(position))
        .filter(|record| record.run != request.origin_run)
        .map(|record| (record.run.as_str(), haversine_miles(record.location(), pickup)))
        .collect();

    let narrowed = policy.narrow(|radius| {
        let mut runs: Vec<&str> = Vec::new();
        for &(run, miles) in &nodes {
            if miles < radius && !runs.contains(&run) {
                runs.push(run);
            }
        }
        runs
    });

    match narrowed {
        Some((radius, runs)) => {
            tracing::debug!(
                booking_id = request.booking_id,
                radius,
                runs = runs.len(),
                "candidate runs found"
            );
            runs.into_iter().map(str::to_string).collect()
        }
        None => {
            tracing::warn!(booking_id = request.booking_id, "no nearby candidate runs");
            Vec::new()
        }
    }
}
