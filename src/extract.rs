//! Building unrouted requests from the day schedule.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::LatLng;
use crate::config::RerouteConfig;
use crate::error::{RerouteError, Result};
use crate::schedule::{DaySchedule, RecordId, ScheduleRecord};

/// Which end of a trip is being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Pickup,
    Dropoff,
}

/// A ride request that must leave its current run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnroutedRequest {
    pub booking_id: u64,
    pub origin_run: String,
    pub pickup: LatLng,
    pub dropoff: LatLng,
    pub pickup_window: (i64, i64),
    pub dropoff_window: (i64, i64),
    pub space_on: String,
    pub mobility_aids: String,
    pub wc_on: u32,
    pub wc_off: u32,
    pub am_on: u32,
    pub am_off: u32,
    /// ETA of the committed pickup; zero until an insertion is committed.
    pub pickup_insert: i64,
    /// ETA of the committed dropoff; zero until an insertion is committed.
    pub dropoff_insert: i64,
    /// `None` for a passenger stranded on board, whose pickup is synthesized.
    pub pickup_record: Option<RecordId>,
    pub dropoff_record: RecordId,
}

impl UnroutedRequest {
    fn paired(
        booking_id: u64,
        (pickup_id, pickup): (RecordId, &ScheduleRecord),
        (dropoff_id, dropoff): (RecordId, &ScheduleRecord),
    ) -> Self {
        Self {
            booking_id,
            origin_run: pickup.run.clone(),
            pickup: pickup.location(),
            dropoff: dropoff.location(),
            pickup_window: (pickup.pickup_start, pickup.pickup_end),
            dropoff_window: (dropoff.dropoff_start, dropoff.dropoff_end),
            space_on: pickup.space_on.clone(),
            mobility_aids: pickup.mobility_aids.clone(),
            wc_on: pickup.wc_on,
            wc_off: dropoff.wc_off,
            am_on: pickup.am_on,
            am_off: dropoff.am_off,
            pickup_insert: 0,
            dropoff_insert: 0,
            pickup_record: Some(pickup_id),
            dropoff_record: dropoff_id,
        }
    }

    fn stranded(
        booking_id: u64,
        (dropoff_id, dropoff): (RecordId, &ScheduleRecord),
        breakdown_location: LatLng,
        pickup_window: (i64, i64),
    ) -> Self {
        Self {
            booking_id,
            origin_run: dropoff.run.clone(),
            pickup: breakdown_location,
            dropoff: dropoff.location(),
            pickup_window,
            dropoff_window: (dropoff.dropoff_start, dropoff.dropoff_end),
            space_on: dropoff.space_on.clone(),
            mobility_aids: dropoff.mobility_aids.clone(),
            wc_on: dropoff.wc_on,
            wc_off: dropoff.wc_off,
            am_on: dropoff.am_on,
            am_off: dropoff.am_off,
            pickup_insert: 0,
            dropoff_insert: 0,
            pickup_record: None,
            dropoff_record: dropoff_id,
        }
    }

    pub fn window(&self, leg: Leg) -> (i64, i64) {
        match leg {
            Leg::Pickup => self.pickup_window,
            Leg::Dropoff => self.dropoff_window,
        }
    }

    pub fn location(&self, leg: Leg) -> LatLng {
        match leg {
            Leg::Pickup => self.pickup,
            Leg::Dropoff => self.dropoff,
        }
    }

    pub fn needs_wheelchair(&self) -> bool {
        self.wc_on > 0
    }

    pub fn is_stranded(&self) -> bool {
        self.pickup_record.is_none()
    }
}

/// A run that broke down, and when rescheduling may start.
#[derive(Debug, Clone)]
pub struct Breakdown {
    pub run: String,
    /// Seconds since midnight; stops scheduled earlier are left alone.
    pub cutoff: i64,
    /// Where the vehicle stopped. When set, passengers already on board are
    /// re-picked up here.
    pub stranded_at: Option<LatLng>,
}

/// Requests still pending on a broken run at or after the cutoff.
///
/// Returned in ascending pickup-window start, ties in booking order.
pub fn from_broken_run(
    schedule: &DaySchedule,
    breakdown: &Breakdown,
    config: &RerouteConfig,
) -> Vec<UnroutedRequest> {
    let mut bookings: BTreeMap<u64, Vec<(RecordId, &ScheduleRecord)>> = BTreeMap::new();
    for (_, id, record) in schedule.iter() {
        if record.run != breakdown.run
            || record.eta < breakdown.cutoff
            || record.activity.is_inactive()
        {
            continue;
        }
        if let Some(booking_id) = record.booking_id {
            bookings.entry(booking_id).or_default().push((id, record));
        }
    }

    let stranded_window = (
        breakdown.cutoff,
        breakdown.cutoff + config.stranded_pickup_window_seconds,
    );

    let mut requests = Vec::with_capacity(bookings.len());
    for (booking_id, records) in bookings {
        match (records.as_slice(), breakdown.stranded_at) {
            ([only], Some(location)) => {
                requests.push(UnroutedRequest::stranded(booking_id, *only, location, stranded_window));
            }
            ([_], None) => {
                tracing::debug!(booking_id, "passenger on board, stranded pickups disabled");
            }
            ([pickup, dropoff, ..], _) => {
                requests.push(UnroutedRequest::paired(booking_id, *pickup, *dropoff));
            }
            ([], _) => {}
        }
    }

    requests.sort_by_key(|request| request.pickup_window.0);
    tracing::info!(
        run = %breakdown.run,
        count = requests.len(),
        "unrouted requests left on broken run"
    );
    requests
}

/// Requests for bookings a dispatcher flagged by id, in ascending
/// pickup-window start.
pub fn from_booking_ids(schedule: &DaySchedule, booking_ids: &[u64]) -> Result<Vec<UnroutedRequest>> {
    let mut requests = Vec::with_capacity(booking_ids.len());
    for &booking_id in booking_ids {
        let records: Vec<(RecordId, &ScheduleRecord)> = schedule
            .booking_positions(booking_id)
            .into_iter()
            .filter_map(|position| schedule.id_at(position).map(|id| (id, schedule.get(id))))
            .collect();

        match records.as_slice() {
            [] => return Err(RerouteError::UnknownBooking(booking_id)),
            [pickup, dropoff, ..] => {
                requests.push(UnroutedRequest::paired(booking_id, *pickup, *dropoff))
            }
            _ => {
                return Err(RerouteError::IncompleteBooking {
                    booking_id,
                    records: records.len(),
                });
            }
        }
    }

    requests.sort_by_key(|request| request.pickup_window.0);
    Ok(requests)
}
