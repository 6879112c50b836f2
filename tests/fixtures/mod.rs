//! Test fixtures for paratransit-reroute.
//!
//! Provides:
//! - Real Seattle-area locations
//! - A builder for day schedules, one run at a time
//! - An in-memory routing oracle with scripted answers
#![allow(dead_code)]

pub mod seattle_locations;

pub use seattle_locations::*;

use std::collections::HashMap;

use paratransit_reroute::LatLng;
use paratransit_reroute::schedule::{Activity, DaySchedule, ScheduleRecord};
use paratransit_reroute::traits::{RouteSummary, RoutingOracle};

// ============================================================================
// Schedule builder
// ============================================================================

/// Builds a day schedule run by run; records are appended in schedule order.
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    records: Vec<ScheduleRecord>,
    run: String,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run with its depot-leave stop.
    pub fn run(mut self, run: &str, depot: &Location, leave_at: i64) -> Self {
        self.run = run.to_string();
        self.push(None, 4, depot, (leave_at, leave_at), leave_at)
    }

    pub fn pickup(self, booking: u64, at: &Location, window: (i64, i64), eta: i64) -> Self {
        self.push(Some(booking), 0, at, window, eta)
    }

    pub fn dropoff(self, booking: u64, at: &Location, window: (i64, i64), eta: i64) -> Self {
        self.push(Some(booking), 1, at, window, eta)
    }

    pub fn activity(self, code: u8, booking: Option<u64>, at: &Location, eta: i64) -> Self {
        self.push(booking, code, at, (eta, eta), eta)
    }

    /// Close the current run with its depot-return stop.
    pub fn back(self, depot: &Location, eta: i64) -> Self {
        self.push(None, 3, depot, (eta, eta), eta)
    }

    /// Set the space type and wheelchair count on the last record.
    pub fn space(mut self, space_on: &str, wheelchairs: u32) -> Self {
        if let Some(record) = self.records.last_mut() {
            record.space_on = space_on.to_string();
            record.wc_on = wheelchairs;
            record.wc_off = wheelchairs;
        }
        self
    }

    pub fn build(self) -> DaySchedule {
        DaySchedule::new(self.records)
    }

    fn push(mut self, booking: Option<u64>, code: u8, at: &Location, window: (i64, i64), eta: i64) -> Self {
        let activity = Activity::from(code);
        let (pickup_window, dropoff_window) = if activity == Activity::Dropoff {
            ((0, 0), window)
        } else {
            (window, (0, 0))
        };
        self.records.push(ScheduleRecord {
            run: self.run.clone(),
            booking_id: booking,
            activity,
            lat: at.lat,
            lng: at.lng,
            pickup_start: pickup_window.0,
            pickup_end: pickup_window.1,
            dropoff_start: dropoff_window.0,
            dropoff_end: dropoff_window.1,
            eta,
            space_on: "AM".to_string(),
            mobility_aids: String::new(),
            wc_on: 0,
            wc_off: 0,
            am_on: u32::from(booking.is_some()),
            am_off: u32::from(booking.is_some()),
        });
        self
    }
}

/// Booking and activity code of every record on `run`, in schedule order.
pub fn run_activities(schedule: &DaySchedule, run: &str) -> Vec<(Option<u64>, u8)> {
    schedule
        .records_in_order()
        .into_iter()
        .filter(|record| record.run == run)
        .map(|record| (record.booking_id, u8::from(record.activity)))
        .collect()
}

pub fn run_etas(schedule: &DaySchedule, run: &str) -> Vec<i64> {
    schedule
        .records_in_order()
        .into_iter()
        .filter(|record| record.run == run)
        .map(|record| record.eta)
        .collect()
}

// ============================================================================
// Scripted routing oracle
// ============================================================================

fn route_key(points: &[LatLng]) -> String {
    points
        .iter()
        .map(|(lat, lng)| format!("{:.6},{:.6}", lat, lng))
        .collect::<Vec<_>>()
        .join(";")
}

/// Routing oracle answering from a script, with a fallback duration for
/// routes not in the script.
#[derive(Debug, Clone)]
pub struct FakeRouter {
    default_secs: f64,
    meters: f64,
    durations: HashMap<String, Option<f64>>,
}

impl FakeRouter {
    /// Every route takes `secs` and covers `meters`.
    pub fn constant(secs: f64, meters: f64) -> Self {
        Self {
            default_secs: secs,
            meters,
            durations: HashMap::new(),
        }
    }

    pub fn route(mut self, points: &[&Location], secs: f64) -> Self {
        let coords: Vec<LatLng> = points.iter().map(|location| location.coords()).collect();
        self.durations.insert(route_key(&coords), Some(secs));
        self
    }

    pub fn no_route(mut self, points: &[&Location]) -> Self {
        let coords: Vec<LatLng> = points.iter().map(|location| location.coords()).collect();
        self.durations.insert(route_key(&coords), None);
        self
    }
}

impl RoutingOracle for FakeRouter {
    fn route(&self, points: &[LatLng]) -> Option<RouteSummary> {
        let duration = match self.durations.get(&route_key(points)) {
            Some(scripted) => (*scripted)?,
            None => self.default_secs,
        };
        Some(RouteSummary {
            duration_secs: duration,
            distance_meters: self.meters,
        })
    }
}
