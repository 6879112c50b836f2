//! OSRM HTTP adapter for detour and point-to-point routes.

use serde::{Deserialize, Serialize};

use crate::LatLng;
use crate::error::Result;
use crate::traits::{RouteSummary, RoutingOracle};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    /// Per-query timeout; a stalled query counts as no route.
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, points: &[LatLng]) -> String {
        let coords = points
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=false",
            self.config.base_url, self.config.profile, coords
        )
    }
}

impl RoutingOracle for OsrmClient {
    fn route(&self, points: &[LatLng]) -> Option<RouteSummary> {
        if points.len() < 2 {
            return None;
        }

        let url = self.route_url(points);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>());

        match response {
            Ok(body) => {
                let summary = body.best_route();
                if summary.is_none() {
                    tracing::debug!(%url, code = %body.code, "OSRM found no route");
                }
                summary
            }
            Err(err) => {
                tracing::warn!(%url, error = %err, "OSRM query failed");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    duration: f64,
    distance: f64,
}

impl OsrmRouteResponse {
    fn best_route(&self) -> Option<RouteSummary> {
        if self.code != "Ok" {
            return None;
        }
        self.routes.first().map(|route| RouteSummary {
            duration_secs: route.duration,
            distance_meters: route.distance,
        })
    }
}
