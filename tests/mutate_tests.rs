mod fixtures;

use fixtures::*;
use paratransit_reroute::config::RerouteConfig;
use paratransit_reroute::error::RerouteError;
use paratransit_reroute::extract::{Breakdown, from_booking_ids, from_broken_run};
use paratransit_reroute::feasibility::InsertionCandidate;
use paratransit_reroute::mutate::apply_insertion;
use paratransit_reroute::schedule::{Activity, DaySchedule};

fn day(pickup_eta: i64) -> DaySchedule {
    ScheduleBuilder::new()
        .run("R1", &SOUTH_PARK_DEPOT, 0)
        .pickup(10, &PIONEER_SQUARE, (500, 600), 550)
        .back(&SOUTH_PARK_DEPOT, 1000)
        .run("R9", &BELLEVUE_DEPOT, 0)
        .pickup(77, &CAPITOL_HILL, (pickup_eta - 50, pickup_eta + 50), pickup_eta)
        .dropoff(77, &UNIVERSITY_DISTRICT, (900, 1100), 900)
        .back(&BELLEVUE_DEPOT, 2000)
        .build()
}

fn candidate() -> InsertionCandidate {
    InsertionCandidate {
        run: "R1".to_string(),
        pickup_leave: 0,
        pickup_return: 1,
        dropoff_leave: 1,
        dropoff_return: 2,
        pickup_lag: 50,
        total_lag: 300,
        additional_time: 1300,
        additional_broken_windows: 0,
        additional_lateness: 0,
        min_run_position: 0,
    }
}

#[test]
fn test_booking_moves_to_target_run() {
    let schedule = day(600);
    let request = from_booking_ids(&schedule, &[77]).unwrap().remove(0);
    let applied = apply_insertion(&schedule, &candidate(), &request).unwrap();

    assert_eq!(
        run_activities(&applied.schedule, "R1"),
        vec![(None, 4), (Some(77), 0), (Some(10), 0), (Some(77), 1), (None, 3)]
    );
    assert_eq!(run_activities(&applied.schedule, "R9"), vec![(None, 4), (None, 3)]);
    assert_eq!(applied.schedule.len(), schedule.len());
    assert_eq!(applied.schedule.get(applied.pickup_record).run, "R1");
    assert_eq!(applied.schedule.get(applied.dropoff_record).activity, Activity::Dropoff);
}

#[test]
fn test_target_run_etas_shift() {
    let schedule = day(600);
    let request = from_booking_ids(&schedule, &[77]).unwrap().remove(0);
    let applied = apply_insertion(&schedule, &candidate(), &request).unwrap();

    // moved records start from the ETA of the stop they precede
    assert_eq!(run_etas(&applied.schedule, "R1"), vec![0, 600, 600, 2350, 2300]);
    assert_eq!(run_etas(&applied.schedule, "R9"), vec![0, 2000]);
}

#[test]
fn test_input_schedule_is_not_modified() {
    let schedule = day(600);
    let request = from_booking_ids(&schedule, &[77]).unwrap().remove(0);
    apply_insertion(&schedule, &candidate(), &request).unwrap();

    assert_eq!(run_etas(&schedule, "R1"), vec![0, 550, 1000]);
    assert_eq!(run_activities(&schedule, "R9").len(), 4);
}

#[test]
fn test_stranded_rider_gets_synthesized_pickup() {
    let schedule = day(100);
    let breakdown = Breakdown {
        run: "R9".to_string(),
        cutoff: 500,
        stranded_at: Some(FIRST_HILL.coords()),
    };
    let request = from_broken_run(&schedule, &breakdown, &RerouteConfig::default()).remove(0);
    assert!(request.is_stranded());

    let applied = apply_insertion(&schedule, &candidate(), &request).unwrap();

    assert_eq!(applied.schedule.len(), schedule.len() + 1);
    assert_eq!(
        run_activities(&applied.schedule, "R1"),
        vec![(None, 4), (Some(77), 0), (Some(10), 0), (Some(77), 1), (None, 3)]
    );
    // the pickup already served stays on the broken run
    assert_eq!(run_activities(&applied.schedule, "R9"), vec![(None, 4), (Some(77), 0), (None, 3)]);

    let pickup = applied.schedule.get(applied.pickup_record);
    assert_eq!(pickup.location(), FIRST_HILL.coords());
    assert_eq!((pickup.pickup_start, pickup.pickup_end), (500, 2300));
    assert_eq!((pickup.dropoff_start, pickup.dropoff_end), (0, 0));
}

#[test]
fn test_position_past_schedule_end_is_rejected() {
    let schedule = day(600);
    let request = from_booking_ids(&schedule, &[77]).unwrap().remove(0);
    let candidate = InsertionCandidate {
        dropoff_return: 99,
        ..candidate()
    };
    assert!(matches!(
        apply_insertion(&schedule, &candidate, &request),
        Err(RerouteError::PositionOutOfRange(99))
    ));
}
