//! Routing client used by the evaluator and cost models.
//!
//! Wraps a [`RoutingOracle`] so that a failed query becomes a very large
//! duration instead of an error. Detour queries for one request fan out on a
//! bounded thread pool.

use rayon::prelude::*;

use crate::LatLng;
use crate::error::Result;
use crate::traits::RoutingOracle;

/// Duration assigned to a detour the oracle could not route.
pub const UNROUTABLE_SECONDS: i64 = 50_000_000_000;

pub struct RoutingClient<R> {
    oracle: R,
    pool: rayon::ThreadPool,
}

impl<R: RoutingOracle> RoutingClient<R> {
    pub fn new(oracle: R, max_concurrency: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_concurrency.max(1))
            .thread_name(|index| format!("routing-{index}"))
            .build()?;
        Ok(Self { oracle, pool })
    }

    /// Round-trip duration `leave -> location -> return` for every pair, in
    /// pair order. Unroutable pairs get [`UNROUTABLE_SECONDS`].
    pub fn detour_times(&self, location: LatLng, pairs: &[(LatLng, LatLng)]) -> Vec<i64> {
        self.pool.install(|| {
            pairs
                .par_iter()
                .map(|&(leave, back)| match self.oracle.route(&[leave, location, back]) {
                    Some(summary) => summary.duration_secs.round() as i64,
                    None => {
                        tracing::debug!(?leave, ?location, ?back, "detour unroutable");
                        UNROUTABLE_SECONDS
                    }
                })
                .collect()
        })
    }

    pub fn travel_seconds(&self, from: LatLng, to: LatLng) -> Option<i64> {
        self.oracle
            .route(&[from, to])
            .map(|summary| summary.duration_secs.round() as i64)
    }

    pub fn distance_meters(&self, from: LatLng, to: LatLng) -> Option<f64> {
        self.oracle.route(&[from, to]).map(|summary| summary.distance_meters)
    }
}

/// Index of the smallest value; the first one wins ties.
pub fn argmin(values: &[i64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .min_by_key(|(index, value)| (**value, *index))
        .map(|(index, _)| index)
}
