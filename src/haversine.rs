//! Great-circle distance, the radius filter, and a straight-line routing
//! fallback for when no OSRM server is reachable.

use serde::{Deserialize, Serialize};

use crate::LatLng;
use crate::traits::{RouteSummary, RoutingOracle};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

const KM_PER_MILE: f64 = 1.609_344;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: LatLng, to: LatLng) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

pub fn haversine_miles(from: LatLng, to: LatLng) -> f64 {
    haversine_km(from, to) / KM_PER_MILE
}

/// Shrinking-radius search bounds.
///
/// The search starts at `initial_miles` and narrows by `step_miles` while it
/// matches more than `max_matches` items. It gives up once the radius would
/// drop below `min_miles` or `max_iterations` radii have been tried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusPolicy {
    pub initial_miles: f64,
    pub step_miles: f64,
    pub min_miles: f64,
    pub max_iterations: usize,
    pub max_matches: usize,
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self {
            initial_miles: 10.0,
            step_miles: 1.0,
            min_miles: 1.0,
            max_iterations: 50,
            max_matches: 30,
        }
    }
}

impl RadiusPolicy {
    /// Try successively smaller radii until `matches_within` returns at most
    /// `max_matches` items.
    ///
    /// Returns the converged radius and its matches, or `None` when the
    /// bounds are exhausted first.
    pub fn narrow<T, F>(&self, mut matches_within: F) -> Option<(f64, Vec<T>)>
    where
        F: FnMut(f64) -> Vec<T>,
    {
        let mut radius = self.initial_miles;
        for _ in 0..self.max_iterations {
            if radius < self.min_miles || radius <= 0.0 {
                break;
            }
            let found = matches_within(radius);
            if found.len() <= self.max_matches {
                return Some((radius, found));
            }
            tracing::debug!(radius, matches = found.len(), "radius too wide, narrowing");
            radius -= self.step_miles;
        }

        tracing::warn!(
            initial = self.initial_miles,
            floor = self.min_miles,
            "radius narrowing exhausted without converging"
        );
        None
    }
}

/// Indices of `points` strictly within `radius_miles` of `center`.
pub fn points_within(center: LatLng, points: &[LatLng], radius_miles: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| haversine_miles(**point, center) < radius_miles)
        .map(|(i, _)| i)
        .collect()
}

/// Radius filter with narrowing: indices of the points inside the first radius
/// that matches at most `policy.max_matches` of them.
pub fn within_radius(center: LatLng, points: &[LatLng], policy: &RadiusPolicy) -> Option<Vec<usize>> {
    policy
        .narrow(|radius| points_within(center, points, radius))
        .map(|(_, found)| found)
}

/// Straight-line routing oracle.
///
/// Estimates travel time using great-circle distance and an assumed speed.
/// Ignores the road network, but always answers.
#[derive(Debug, Clone)]
pub struct HaversineRouter {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineRouter {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineRouter {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64) -> f64 {
        (km / self.speed_kmh * 3600.0).round()
    }
}

impl RoutingOracle for HaversineRouter {
    fn route(&self, points: &[LatLng]) -> Option<RouteSummary> {
        if points.len() < 2 {
            return None;
        }
        let km: f64 = points.windows(2).map(|leg| haversine_km(leg[0], leg[1])).sum();
        Some(RouteSummary {
            duration_secs: self.km_to_seconds(km),
            distance_meters: km * 1000.0,
        })
    }
}
