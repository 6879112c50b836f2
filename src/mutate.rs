//! Committing an insertion to the day schedule.

use crate::error::{RerouteError, Result};
use crate::extract::{Leg, UnroutedRequest};
use crate::feasibility::InsertionCandidate;
use crate::schedule::{Activity, DaySchedule, RecordId, ScheduleRecord};

/// New schedule version after a commit, plus where the moved records ended up.
#[derive(Debug, Clone)]
pub struct AppliedInsertion {
    pub schedule: DaySchedule,
    pub pickup_record: RecordId,
    pub dropoff_record: RecordId,
}

fn synthesized_pickup(request: &UnroutedRequest, dropoff: &ScheduleRecord) -> ScheduleRecord {
    let (lat, lng) = request.location(Leg::Pickup);
    let (pickup_start, pickup_end) = request.window(Leg::Pickup);
    ScheduleRecord {
        activity: Activity::Pickup,
        lat,
        lng,
        pickup_start,
        pickup_end,
        dropoff_start: 0,
        dropoff_end: 0,
        wc_off: 0,
        am_off: 0,
        ..dropoff.clone()
    }
}

/// Move `request`'s pickup and dropoff onto `candidate.run`, just before the
/// candidate's pickup-return and dropoff-return stops.
///
/// On the target run, ETAs from the new pickup through the new dropoff shift
/// by the pickup lag, and ETAs from the new dropoff onward shift by the added
/// detour time. The moved records start from the ETA of the stop they now
/// precede. `schedule` itself is left untouched.
///
/// The moved dropoff carries both shifts while the stops after it carry only
/// the detour time, so the dropoff can end up with a later ETA than the stop
/// that follows it. That inversion is intended; do not smooth it here.
pub fn apply_insertion(
    schedule: &DaySchedule,
    candidate: &InsertionCandidate,
    request: &UnroutedRequest,
) -> Result<AppliedInsertion> {
    let pickup_anchor = schedule
        .id_at(candidate.pickup_return)
        .ok_or(RerouteError::PositionOutOfRange(candidate.pickup_return))?;
    let dropoff_anchor = schedule
        .id_at(candidate.dropoff_return)
        .ok_or(RerouteError::PositionOutOfRange(candidate.dropoff_return))?;

    let (mut records, mut order) = schedule.clone().into_parts();

    let dropoff_id = request.dropoff_record;
    let pickup_id = match request.pickup_record {
        Some(id) => id,
        None => {
            let record = synthesized_pickup(request, &records[dropoff_id.0]);
            records.push(record);
            RecordId(records.len() - 1)
        }
    };

    order.retain(|id| *id != pickup_id && *id != dropoff_id);
    let moves = [
        (pickup_id, pickup_anchor, candidate.pickup_return),
        (dropoff_id, dropoff_anchor, candidate.dropoff_return),
    ];
    for (moved, anchor, position) in moves {
        let index = order
            .iter()
            .position(|id| *id == anchor)
            .ok_or(RerouteError::PositionOutOfRange(position))?;
        order.insert(index, moved);

        let anchor_eta = records[anchor.0].eta;
        let record = &mut records[moved.0];
        record.run = candidate.run.clone();
        record.eta = anchor_eta;
    }

    let target_run: Vec<RecordId> = order
        .iter()
        .copied()
        .filter(|id| records[id.0].run == candidate.run)
        .collect();
    let pickup_index = target_run.iter().position(|id| *id == pickup_id);
    let dropoff_index = target_run.iter().position(|id| *id == dropoff_id);
    if let (Some(pickup_index), Some(dropoff_index)) = (pickup_index, dropoff_index) {
        for (index, id) in target_run.iter().enumerate().skip(pickup_index) {
            if index <= dropoff_index {
                records[id.0].eta += candidate.pickup_lag;
            }
            if index >= dropoff_index {
                records[id.0].eta += candidate.additional_time;
            }
        }
    }

    tracing::info!(
        booking_id = request.booking_id,
        from = %request.origin_run,
        to = %candidate.run,
        "insertion committed"
    );

    Ok(AppliedInsertion {
        schedule: DaySchedule::from_parts(records, order),
        pickup_record: pickup_id,
        dropoff_record: dropoff_id,
    })
}
