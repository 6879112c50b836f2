//! In-memory day schedule for the whole fleet.
//!
//! Records live in an arena addressed by [`RecordId`]; the schedule order is a
//! separate list of ids, so a position is just an index into that list.
//! Moving a booking between runs rewrites the id list and never touches the
//! ids other components hold.

use serde::{Deserialize, Serialize};

use crate::LatLng;
use crate::error::{RerouteError, Result};

/// Activity code of a schedule record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Activity {
    /// Code 0.
    Pickup,
    /// Code 1.
    Dropoff,
    /// Code 3.
    ReturnToDepot,
    /// Code 4.
    LeaveDepot,
    /// Code 6.
    NonPassenger,
    /// Code 16.
    Cancelled,
    Other(u8),
}

impl Activity {
    pub fn is_passenger(self) -> bool {
        matches!(self, Activity::Pickup | Activity::Dropoff)
    }

    /// Records that no longer count as pending work when a run breaks down.
    pub fn is_inactive(self) -> bool {
        matches!(
            self,
            Activity::ReturnToDepot | Activity::NonPassenger | Activity::Cancelled
        )
    }
}

impl From<u8> for Activity {
    fn from(code: u8) -> Self {
        match code {
            0 => Activity::Pickup,
            1 => Activity::Dropoff,
            3 => Activity::ReturnToDepot,
            4 => Activity::LeaveDepot,
            6 => Activity::NonPassenger,
            16 => Activity::Cancelled,
            other => Activity::Other(other),
        }
    }
}

impl From<Activity> for u8 {
    fn from(activity: Activity) -> Self {
        match activity {
            Activity::Pickup => 0,
            Activity::Dropoff => 1,
            Activity::ReturnToDepot => 3,
            Activity::LeaveDepot => 4,
            Activity::NonPassenger => 6,
            Activity::Cancelled => 16,
            Activity::Other(code) => code,
        }
    }
}

/// One stop or event on a vehicle run. Times are seconds since midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub run: String,
    pub booking_id: Option<u64>,
    pub activity: Activity,
    pub lat: f64,
    pub lng: f64,
    pub pickup_start: i64,
    pub pickup_end: i64,
    pub dropoff_start: i64,
    pub dropoff_end: i64,
    pub eta: i64,
    #[serde(default)]
    pub space_on: String,
    #[serde(default)]
    pub mobility_aids: String,
    #[serde(default)]
    pub wc_on: u32,
    #[serde(default)]
    pub wc_off: u32,
    #[serde(default)]
    pub am_on: u32,
    #[serde(default)]
    pub am_off: u32,
}

impl ScheduleRecord {
    pub fn location(&self) -> LatLng {
        (self.lat, self.lng)
    }

    /// Effective time window: the later of the pickup/dropoff starts to the
    /// later of their ends.
    pub fn window(&self) -> (i64, i64) {
        (
            self.pickup_start.max(self.dropoff_start),
            self.window_bound(),
        )
    }

    /// Latest on-time arrival.
    pub fn window_bound(&self) -> i64 {
        self.pickup_end.max(self.dropoff_end)
    }
}

/// Stable arena index of a schedule record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub usize);

/// Whole-fleet schedule for one service day.
#[derive(Debug, Clone, Default)]
pub struct DaySchedule {
    records: Vec<ScheduleRecord>,
    order: Vec<RecordId>,
}

impl DaySchedule {
    /// Build a schedule whose order is the order of `records`.
    pub fn new(records: Vec<ScheduleRecord>) -> Self {
        let order = (0..records.len()).map(RecordId).collect();
        Self { records, order }
    }

    pub(crate) fn from_parts(records: Vec<ScheduleRecord>, order: Vec<RecordId>) -> Self {
        Self { records, order }
    }

    pub(crate) fn into_parts(self) -> (Vec<ScheduleRecord>, Vec<RecordId>) {
        (self.records, self.order)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: RecordId) -> &ScheduleRecord {
        &self.records[id.0]
    }

    pub fn id_at(&self, position: usize) -> Option<RecordId> {
        self.order.get(position).copied()
    }

    pub fn at(&self, position: usize) -> Option<&ScheduleRecord> {
        self.id_at(position).map(|id| self.get(id))
    }

    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == id)
    }

    /// Records in schedule order with their positions and ids.
    pub fn iter(&self) -> impl Iterator<Item = (usize, RecordId, &ScheduleRecord)> + '_ {
        self.order
            .iter()
            .enumerate()
            .map(move |(position, id)| (position, *id, &self.records[id.0]))
    }

    pub fn records_in_order(&self) -> Vec<&ScheduleRecord> {
        self.order.iter().map(|id| &self.records[id.0]).collect()
    }

    pub fn run_positions(&self, run: &str) -> Vec<usize> {
        self.iter()
            .filter(|(_, _, record)| record.run == run)
            .map(|(position, _, _)| position)
            .collect()
    }

    pub fn booking_positions(&self, booking_id: u64) -> Vec<usize> {
        self.iter()
            .filter(|(_, _, record)| record.booking_id == Some(booking_id))
            .map(|(position, _, _)| position)
            .collect()
    }

    /// Distinct run ids in order of first appearance.
    pub fn runs(&self) -> Vec<&str> {
        let mut runs: Vec<&str> = Vec::new();
        for (_, _, record) in self.iter() {
            if !runs.contains(&record.run.as_str()) {
                runs.push(&record.run);
            }
        }
        runs
    }

    /// Active span of `run`: from `from_position` (or the run's first stop)
    /// through its first depot-return stop. A non-passenger stop right before
    /// the depot return ends the span instead.
    pub fn route_slice(&self, run: &str, from_position: Option<usize>) -> Result<RouteSlice<'_>> {
        let positions = self.run_positions(run);
        let first = *positions
            .first()
            .ok_or_else(|| RerouteError::RunNotFound(run.to_string()))?;
        let start = from_position.unwrap_or(first).max(first);

        let run_records: Vec<(usize, RecordId, &ScheduleRecord)> = positions
            .iter()
            .filter_map(|&position| self.id_at(position).map(|id| (position, id, self.get(id))))
            .collect();

        let mut end_index = run_records
            .iter()
            .position(|(position, _, record)| {
                *position >= start && record.activity == Activity::ReturnToDepot
            })
            .ok_or_else(|| RerouteError::MalformedRun(run.to_string()))?;

        if end_index > 0 {
            let (position, _, record) = run_records[end_index - 1];
            if record.activity == Activity::NonPassenger && position >= start {
                end_index -= 1;
            }
        }

        let stops = run_records[..=end_index]
            .iter()
            .filter(|(position, _, _)| *position >= start)
            .map(|&(position, id, record)| RouteStop {
                position,
                id,
                record,
                eta: record.eta,
            })
            .collect();

        Ok(RouteSlice {
            run: run.to_string(),
            stops,
        })
    }
}

/// A stop of a route slice, carrying its own (possibly lagged) ETA.
#[derive(Debug, Clone, Copy)]
pub struct RouteStop<'a> {
    pub position: usize,
    pub id: RecordId,
    pub record: &'a ScheduleRecord,
    pub eta: i64,
}

/// Contiguous run of stops for one vehicle, borrowed from a [`DaySchedule`].
#[derive(Debug, Clone)]
pub struct RouteSlice<'a> {
    pub run: String,
    pub stops: Vec<RouteStop<'a>>,
}

impl<'a> RouteSlice<'a> {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn first_position(&self) -> Option<usize> {
        self.stops.first().map(|stop| stop.position)
    }

    pub fn stop(&self, position: usize) -> Option<&RouteStop<'a>> {
        self.stops
            .binary_search_by_key(&position, |stop| stop.position)
            .ok()
            .map(|index| &self.stops[index])
    }

    /// Stops at or after `position`.
    pub fn stops_from(&self, position: usize) -> &[RouteStop<'a>] {
        let index = self.stops.partition_point(|stop| stop.position < position);
        &self.stops[index..]
    }

    /// Copy of this slice with every ETA shifted by `lag` seconds.
    pub fn lagged(&self, lag: i64) -> RouteSlice<'a> {
        RouteSlice {
            run: self.run.clone(),
            stops: self
                .stops
                .iter()
                .map(|stop| RouteStop {
                    eta: stop.eta + lag,
                    ..*stop
                })
                .collect(),
        }
    }

    pub fn records(&self) -> impl Iterator<Item = (usize, &'a ScheduleRecord)> + '_ {
        self.stops.iter().map(|stop| (stop.position, stop.record))
    }
}
