//! Fallback options: a taxi for one passenger, or a new vehicle for a run.

use serde::{Deserialize, Serialize};

use crate::LatLng;
use crate::config::RerouteConfig;
use crate::error::{RerouteError, Result};
use crate::extract::{Leg, UnroutedRequest};
use crate::routing::RoutingClient;
use crate::schedule::RouteSlice;
use crate::traits::RoutingOracle;

const METERS_PER_TENTH_MILE: f64 = 160.934;

/// One mileage band of a taxi tariff. Bands are checked in order; the first
/// whose `below_miles` exceeds the trip applies, `None` matches any trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffTier {
    pub below_miles: Option<f64>,
    pub base: f64,
    pub per_mile: f64,
}

impl TariffTier {
    fn new(below_miles: Option<f64>, base: f64, per_mile: f64) -> Self {
        Self {
            below_miles,
            base,
            per_mile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxiTariff {
    pub wheelchair: Vec<TariffTier>,
    pub ambulatory: Vec<TariffTier>,
    /// Space-type marker of riders who may not use a taxi.
    pub no_taxi_marker: String,
}

impl Default for TaxiTariff {
    fn default() -> Self {
        Self {
            wheelchair: vec![
                TariffTier::new(Some(16.67), 21.0, 3.5),
                TariffTier::new(Some(61.0), 20.0, 3.56),
                TariffTier::new(None, 18.78, 3.58),
            ],
            ambulatory: vec![
                TariffTier::new(Some(2.14), 3.0, 2.6),
                TariffTier::new(None, 0.0, 4.0),
            ],
            no_taxi_marker: "OT".to_string(),
        }
    }
}

fn tier_fare(tiers: &[TariffTier], miles: f64) -> Option<f64> {
    tiers
        .iter()
        .find(|tier| tier.below_miles.is_none_or(|limit| miles < limit))
        .map(|tier| tier.base + miles * tier.per_mile)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum TaxiCost {
    /// The rider's space type forbids taxi service.
    NotApplicable,
    Fare(f64),
    /// The fare could not be priced; never the cheapest option.
    Unavailable,
}

impl TaxiCost {
    /// Cost for comparisons; anything but a fare compares as the maximum.
    pub fn comparable(self) -> f64 {
        match self {
            TaxiCost::Fare(amount) => amount,
            TaxiCost::NotApplicable | TaxiCost::Unavailable => f64::MAX,
        }
    }
}

/// Road miles rounded up to the next tenth.
pub fn billable_miles(distance_meters: f64) -> f64 {
    (distance_meters / METERS_PER_TENTH_MILE).ceil() / 10.0
}

/// Fare for a trip of `miles` under `tariff`.
pub fn taxi_fare(tariff: &TaxiTariff, miles: f64, wheelchair: bool, space_on: &str) -> TaxiCost {
    if space_on.contains(tariff.no_taxi_marker.as_str()) {
        return TaxiCost::NotApplicable;
    }
    let tiers = if wheelchair {
        &tariff.wheelchair
    } else {
        &tariff.ambulatory
    };
    tier_fare(tiers, miles).map_or(TaxiCost::Unavailable, TaxiCost::Fare)
}

/// Taxi fare for carrying `request` from its pickup to its dropoff.
pub fn taxi_cost<R: RoutingOracle>(
    request: &UnroutedRequest,
    client: &RoutingClient<R>,
    config: &RerouteConfig,
) -> TaxiCost {
    if request.space_on.contains(config.taxi.no_taxi_marker.as_str()) {
        return TaxiCost::NotApplicable;
    }
    match client.distance_meters(request.location(Leg::Pickup), request.location(Leg::Dropoff)) {
        Some(meters) => taxi_fare(
            &config.taxi,
            billable_miles(meters),
            request.needs_wheelchair(),
            &request.space_on,
        ),
        None => {
            tracing::warn!(booking_id = request.booking_id, "no road distance for taxi fare");
            TaxiCost::Unavailable
        }
    }
}

/// Contractor that can dispatch a new vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRate {
    pub code: u32,
    pub depot: LatLng,
    pub hourly_rate: f64,
}

impl ProviderRate {
    pub fn known_providers() -> Vec<ProviderRate> {
        vec![
            ProviderRate {
                code: 5,
                depot: (47.591956, -122.182784),
                hourly_rate: 46.85,
            },
            ProviderRate {
                code: 6,
                depot: (47.530563, -122.322681),
                hourly_rate: 51.79,
            },
        ]
    }
}

/// Cost of sending a new vehicle from `provider_code`'s depot to drive
/// `route` and return, billed in whole hours with a minimum charge.
pub fn new_vehicle_cost<R: RoutingOracle>(
    route: &RouteSlice<'_>,
    provider_code: u32,
    client: &RoutingClient<R>,
    config: &RerouteConfig,
) -> Result<f64> {
    let provider = config
        .provider(provider_code)
        .ok_or(RerouteError::InvalidProvider(provider_code))?;

    let (first, last) = match (route.stops.first(), route.stops.last()) {
        (Some(first), Some(last)) => (first.record, last.record),
        _ => return Err(RerouteError::RunNotFound(route.run.clone())),
    };

    let active_span = (last.window_bound() - first.window().0).max(0);
    let to_route = client
        .travel_seconds(provider.depot, first.location())
        .ok_or(RerouteError::NoRoute {
            from: provider.depot,
            to: first.location(),
        })?;
    let from_route = client
        .travel_seconds(last.location(), provider.depot)
        .ok_or(RerouteError::NoRoute {
            from: last.location(),
            to: provider.depot,
        })?;

    let seconds = to_route + active_span + from_route;
    let hours = (seconds + 3599).div_euclid(3600).max(config.minimum_billed_hours);
    Ok(provider.hourly_rate * hours as f64)
}
