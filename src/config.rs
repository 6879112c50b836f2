//! Configuration for a rescheduling session.
//!
//! Every tunable the evaluator and cost models read lives here so the
//! constants can be overridden from a JSON file per deployment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cost::{ProviderRate, TaxiTariff};
use crate::error::Result;
use crate::haversine::RadiusPolicy;
use crate::osrm::OsrmConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerouteConfig {
    /// Time spent at a stop to board or alight, in seconds.
    pub dwell_seconds: i64,
    /// Fixed overhead added to every insertion's detour time, in seconds.
    pub detour_overhead_seconds: i64,
    /// Width of the synthesized pickup window for passengers stranded on board.
    pub stranded_pickup_window_seconds: i64,
    pub radius: RadiusPolicy,
    pub taxi: TaxiTariff,
    pub providers: Vec<ProviderRate>,
    /// New vehicles are billed for at least this many hours.
    pub minimum_billed_hours: i64,
    /// Cost of one hour of added route time on an existing bus.
    pub bus_delay_cost_per_hour: f64,
    /// Cost charged per newly broken time window.
    pub broken_window_penalty: f64,
    /// Upper bound on routing queries in flight at once.
    pub max_concurrency: usize,
    pub osrm: OsrmConfig,
}

impl Default for RerouteConfig {
    fn default() -> Self {
        Self {
            dwell_seconds: 500,
            detour_overhead_seconds: 1000,
            stranded_pickup_window_seconds: 30 * 60,
            radius: RadiusPolicy::default(),
            taxi: TaxiTariff::default(),
            providers: ProviderRate::known_providers(),
            minimum_billed_hours: 4,
            bus_delay_cost_per_hour: 50.0,
            broken_window_penalty: 25.0,
            max_concurrency: 8,
            osrm: OsrmConfig::default(),
        }
    }
}

impl RerouteConfig {
    /// Load a config file; absent keys fall back to the defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn provider(&self, code: u32) -> Option<&ProviderRate> {
        self.providers.iter().find(|provider| provider.code == code)
    }
}
