mod fixtures;

use fixtures::*;
use paratransit_reroute::candidates::nearby_runs;
use paratransit_reroute::extract::from_booking_ids;
use paratransit_reroute::haversine::RadiusPolicy;
use paratransit_reroute::schedule::DaySchedule;

/// Rider 77 on R9 is picked up on Capitol Hill. R1 passes Pioneer Square,
/// R3 passes Fremont, R2 works Tacoma; all three have a stop in the window.
fn fleet() -> DaySchedule {
    ScheduleBuilder::new()
        .run("R1", &SOUTH_PARK_DEPOT, 0)
        .pickup(10, &PIONEER_SQUARE, (500, 600), 550)
        .back(&SOUTH_PARK_DEPOT, 1000)
        .run("R3", &NORTHGATE, 0)
        .pickup(11, &FREMONT, (500, 600), 560)
        .back(&NORTHGATE, 1100)
        .run("R9", &BELLEVUE_DEPOT, 0)
        .pickup(77, &CAPITOL_HILL, (550, 650), 600)
        .dropoff(77, &UNIVERSITY_DISTRICT, (900, 1100), 900)
        .back(&BELLEVUE_DEPOT, 2000)
        .run("R2", &TACOMA_DOME, 0)
        .pickup(12, &TACOMA_DOME, (500, 600), 520)
        .back(&TACOMA_DOME, 900)
        .build()
}

#[test]
fn test_nearby_runs_exclude_origin_and_distant_runs() {
    let schedule = fleet();
    let request = from_booking_ids(&schedule, &[77]).unwrap().remove(0);
    let runs = nearby_runs(&schedule, &request, &RadiusPolicy::default());
    assert_eq!(runs, vec!["R1".to_string(), "R3".to_string()]);
}

#[test]
fn test_radius_narrows_to_closest_run() {
    let schedule = fleet();
    let request = from_booking_ids(&schedule, &[77]).unwrap().remove(0);
    let policy = RadiusPolicy {
        max_matches: 1,
        ..RadiusPolicy::default()
    };
    // Pioneer Square is about 1.5 miles out, Fremont about 2.5
    assert_eq!(nearby_runs(&schedule, &request, &policy), vec!["R1".to_string()]);
}

#[test]
fn test_exhausted_radius_yields_no_runs() {
    let schedule = fleet();
    let request = from_booking_ids(&schedule, &[77]).unwrap().remove(0);
    let policy = RadiusPolicy {
        max_matches: 0,
        ..RadiusPolicy::default()
    };
    assert!(nearby_runs(&schedule, &request, &policy).is_empty());
}

#[test]
fn test_no_window_overlap_yields_no_runs() {
    let schedule = ScheduleBuilder::new()
        .run("R1", &SOUTH_PARK_DEPOT, 0)
        .pickup(10, &PIONEER_SQUARE, (5000, 5600), 5000)
        .back(&SOUTH_PARK_DEPOT, 7000)
        .run("R9", &BELLEVUE_DEPOT, 0)
        .pickup(77, &CAPITOL_HILL, (550, 650), 600)
        .dropoff(77, &UNIVERSITY_DISTRICT, (900, 1100), 900)
        .back(&BELLEVUE_DEPOT, 2000)
        .build();
    let request = from_booking_ids(&schedule, &[77]).unwrap().remove(0);
    assert!(nearby_runs(&schedule, &request, &RadiusPolicy::default()).is_empty());
}
