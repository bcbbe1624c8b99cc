//! Maneuver tests against the simulated vehicle.
//!
//! The simulation runs in real time, so the vehicle is made fast and the
//! control loops short, and tolerances allow for scheduling jitter.

use wall_lib::{
    nav_ctrl::{MnvrOutcome, NavCtrl, NavCtrlParams, NavError, Stage},
    scan_proc::ScanProcParams,
    sim::{SimCar, SimParams},
    steer_ctrl::SteerCtrlParams,
};
use util::maths::heading_error_deg;

// ---------------------------------------------------------------------------
// HELPERS
// ---------------------------------------------------------------------------

/// Ground rate of the test vehicle at the maneuver speed.
const RATE_CM_S: f64 = 100.0;

fn nav_params() -> NavCtrlParams {
    NavCtrlParams {
        rate_cm_s: RATE_CM_S,
        turn_poll_period_s: 0.01,
        drive_period_s: 0.01,
        archive_scans: false,
        ..Default::default()
    }
}

fn sim_params(walls: Vec<[f64; 4]>, heading_deg: f64) -> SimParams {
    SimParams {
        walls,
        start_position: [0.0, 0.0],
        start_heading_deg: heading_deg,
        speed_to_rate: RATE_CM_S / 150.0,
        spin_to_rate: 2.0,
        scan_duration_s: 0.02,
        ..Default::default()
    }
}

fn nav(walls: Vec<[f64; 4]>, heading_deg: f64, params: NavCtrlParams) -> NavCtrl<SimCar> {
    NavCtrl::new(
        SimCar::new(sim_params(walls, heading_deg)),
        params,
        ScanProcParams::default(),
        SteerCtrlParams::default(),
    )
}

/// A long straight wall `dist` to the west of the start.
fn west_wall(dist: f64) -> Vec<[f64; 4]> {
    vec![[-dist, -300.0, -dist, 300.0]]
}

fn final_pose(nav: NavCtrl<SimCar>) -> (f64, f64, f64) {
    let mut car = nav.into_car();
    let p = car.position();
    (p.x, p.y, car.true_heading())
}

// ---------------------------------------------------------------------------
// TURNS
// ---------------------------------------------------------------------------

#[test]
fn test_turn_to_across_north() {
    let mut nav = nav(west_wall(100.0), 300.0, nav_params());

    nav.turn_to(30.0).unwrap();

    let (_, _, heading) = final_pose(nav);
    assert!(heading_error_deg(heading, 30.0).abs() < 3.0, "heading {}", heading);
}

#[test]
fn test_turn_timeout() {
    let mut nav = nav(
        west_wall(100.0),
        0.0,
        NavCtrlParams { max_turn_cycles: 0, ..nav_params() },
    );

    assert!(matches!(nav.turn_to(90.0), Err(NavError::TurnTimeout { .. })));
}

#[test]
fn test_radius_turn_left() {
    let mut nav = nav(west_wall(500.0), 0.0, nav_params());

    nav.radius_turn_on_the_go(150, 90.0, 90.0, 40.0).unwrap();

    let (x, y, heading) = final_pose(nav);
    assert!(heading_error_deg(heading, 270.0).abs() < 6.0, "heading {}", heading);
    // Moved forward and round to the left
    assert!(y > 0.0 && x < 0.0, "position ({}, {})", x, y);
}

#[test]
fn test_radius_turn_invalid_radius() {
    let mut nav = nav(west_wall(100.0), 0.0, nav_params());

    assert!(matches!(
        nav.radius_turn_on_the_go(150, 90.0, 90.0, 0.0),
        Err(NavError::InvalidTurnRadius(_))
    ));
}

// ---------------------------------------------------------------------------
// WALL MANEUVERS
// ---------------------------------------------------------------------------

#[test]
fn test_closest_wall() {
    let mut nav = nav(west_wall(60.0), 0.0, nav_params());

    let line = nav.closest_wall(0).unwrap();
    assert!((line.origin_distance - 60.0).abs() < 2.0);
    assert!((line.angle_deg - 90.0).abs() < 2.0);
}

#[test]
fn test_no_wall() {
    let mut nav = nav(vec![], 0.0, nav_params());
    assert!(matches!(nav.closest_wall(7), Err(NavError::NoWallFound(7))));
}

#[test]
fn test_align_to_wall() {
    let mut nav = nav(west_wall(60.0), 20.0, nav_params());

    nav.align_to_wall(0).unwrap();

    let (_, _, heading) = final_pose(nav);
    assert!(heading_error_deg(heading, 0.0).abs() < 5.0, "heading {}", heading);
}

#[test]
fn test_square_to_wall() {
    // Wall to the north, vehicle pointing north east
    let mut nav = nav(vec![[-300.0, 80.0, 300.0, 80.0]], 40.0, nav_params());

    nav.square_to_wall(0).unwrap();

    let (_, _, heading) = final_pose(nav);
    assert!(heading_error_deg(heading, 0.0).abs() < 5.0, "heading {}", heading);
}

#[test]
fn test_approach_wall() {
    let mut nav = nav(west_wall(100.0), 0.0, nav_params());

    let outcome = nav.approach_wall(180.0, 150, 40.0, 1).unwrap();
    assert_eq!(outcome, MnvrOutcome::Complete);

    let (x, _, heading) = final_pose(nav);
    assert!((x + 100.0 - 40.0).abs() < 8.0, "x {}", x);
    assert!(heading_error_deg(heading, 0.0).abs() < 3.0);
}

#[test]
fn test_back_away_from_wall() {
    let mut nav = nav(west_wall(20.0), 0.0, nav_params());

    let outcome = nav.approach_wall(180.0, 150, 40.0, 1).unwrap();
    assert_eq!(outcome, MnvrOutcome::Complete);

    let (x, _, _) = final_pose(nav);
    assert!((x + 20.0 - 40.0).abs() < 8.0, "x {}", x);
}

#[test]
fn test_approach_interrupted_by_obstacle() {
    let mut nav = nav(
        west_wall(100.0),
        0.0,
        NavCtrlParams { stop_distance_cm: 60.0, ..nav_params() },
    );

    match nav.approach_wall(180.0, 150, 40.0, 1).unwrap() {
        MnvrOutcome::Interrupted(o) => {
            assert!(o.range_cm < 60.0);
            assert_eq!(o.direction_deg, 180.0);
        }
        MnvrOutcome::Complete => panic!("Approach was not interrupted"),
    }

    // Stopped short of the clearance
    let (x, _, _) = final_pose(nav);
    assert!(x + 100.0 > 50.0, "x {}", x);
}

#[test]
fn test_drive_along_wall_on_left() {
    let mut nav = nav(vec![[-40.0, -300.0, -40.0, 150.0]], 0.0, nav_params());

    let result = nav.drive_along_wall_on_left(150, 40.0, 2).unwrap();

    assert_eq!(result.outcome, MnvrOutcome::Complete);
    assert!((result.wall_distance_cm - 40.0).abs() < 5.0);
    assert!(result.last_scan > 3);

    let (x, y, _) = final_pose(nav);
    assert!(y > 90.0 && y < 145.0, "y {}", y);
    assert!((x + 40.0 - 40.0).abs() < 8.0, "x {}", x);
}

#[test]
fn test_drive_along_wall_blocked_ahead() {
    // Wall on the left with a post across the path 100cm ahead
    // The stop distance exceeds the clearance so the wall stays the closest
    // return until the stop
    let walls = vec![
        [-40.0, -300.0, -40.0, 150.0],
        [-10.0, 100.0, 10.0, 100.0],
    ];
    let mut nav = nav(
        walls,
        0.0,
        NavCtrlParams { stop_distance_cm: 50.0, ..nav_params() },
    );

    let result = nav.drive_along_wall_on_left(150, 40.0, 2).unwrap();

    match result.outcome {
        MnvrOutcome::Interrupted(o) => {
            assert!(o.range_cm < 50.0);
            assert!((o.direction_deg - 90.0).abs() < 30.0);
        }
        MnvrOutcome::Complete => panic!("Drive along wall was not interrupted"),
    }
    assert!((result.wall_distance_cm - 40.0).abs() < 5.0);

    // Stopped short of the post, well before the end of the wall
    let (_, y, _) = final_pose(nav);
    assert!(y > 40.0 && y < 65.0, "y {}", y);
}

#[test]
fn test_turn_rejects_bad_tolerances() {
    let mut nav = nav(
        west_wall(100.0),
        0.0,
        NavCtrlParams {
            turn_stop_tolerance_deg: 5.0,
            turn_done_tolerance_deg: 3.0,
            ..nav_params()
        },
    );

    assert!(matches!(nav.turn_to(90.0), Err(NavError::InvalidParam { .. })));
}

// ---------------------------------------------------------------------------
// PLANNING
// ---------------------------------------------------------------------------

/// Two wall pieces 100cm ahead with a 60cm doorway straight ahead.
fn doorway() -> Vec<[f64; 4]> {
    vec![
        [-150.0, 100.0, -30.0, 100.0],
        [30.0, 100.0, 150.0, 100.0],
    ]
}

#[test]
fn test_scan_and_plan() {
    let mut nav = nav(doorway(), 0.0, nav_params());

    let plan = nav.scan_and_plan(0).unwrap();
    assert!(plan.course_deg.abs() < 3.0, "course {}", plan.course_deg);
    assert!((plan.range_cm - 100.0).abs() < 3.0, "range {}", plan.range_cm);

    let outcome = nav.drive_to_waypoint(plan.course_deg, plan.range_cm).unwrap();
    assert_eq!(outcome, MnvrOutcome::Complete);

    let (x, y, _) = final_pose(nav);
    assert!((y - 100.0).abs() < 10.0, "y {}", y);
    assert!(x.abs() < 10.0, "x {}", x);
}

#[test]
fn test_no_usable_gap() {
    let mut nav = nav(west_wall(60.0), 0.0, nav_params());
    assert!(matches!(nav.scan_and_plan(5), Err(NavError::NoUsableGap(5))));
}

#[test]
fn test_goto_open_sector() {
    // Only a wall on the left, open space ahead and to the right
    let mut nav = nav(vec![[-50.0, -1000.0, -50.0, 1000.0]], 0.0, nav_params());

    let outcome = nav.goto_open_sector(0).unwrap();
    assert_eq!(outcome, MnvrOutcome::Complete);

    let (x, y, heading) = final_pose(nav);
    assert!(heading > 15.0 && heading < 60.0, "heading {}", heading);
    assert!(x > 30.0 && y > 30.0, "position ({}, {})", x, y);
}

#[test]
fn test_no_open_sector() {
    let mut nav = nav(vec![], 0.0, nav_params());
    assert!(matches!(nav.goto_open_sector(1), Err(NavError::NoOpenSector(1))));
}

#[test]
fn test_pid_steer_test() {
    let mut nav = nav(west_wall(300.0), 45.0, nav_params());

    assert_eq!(nav.pid_steer_test(20).unwrap(), MnvrOutcome::Complete);

    let (x, y, heading) = final_pose(nav);
    assert!(heading_error_deg(heading, 45.0).abs() < 2.0);
    assert!(x > 0.0 && y > 0.0);
}

// ---------------------------------------------------------------------------
// SEQUENCES
// ---------------------------------------------------------------------------

#[test]
fn test_follow_walls_left_one_cycle() {
    let mut nav = nav(vec![[-100.0, -300.0, -100.0, 150.0]], 0.0, nav_params());

    let records = nav.follow_walls_left(1).unwrap();

    let stages: Vec<Stage> = records.iter().map(|r| r.stage).collect();
    assert_eq!(stages, vec![Stage::Align, Stage::Approach, Stage::Along, Stage::Around]);
    assert!(records.iter().all(|r| r.outcome == MnvrOutcome::Complete));

    let (_, _, heading) = final_pose(nav);
    assert!(heading_error_deg(heading, 270.0).abs() < 10.0, "heading {}", heading);
}

#[test]
fn test_follow_walls_left_lite() {
    let mut nav = nav(vec![[-40.0, -300.0, -40.0, 120.0]], 0.0, nav_params());

    let records = nav.follow_walls_left_lite(1).unwrap();

    let stages: Vec<Stage> = records.iter().map(|r| r.stage).collect();
    assert_eq!(stages, vec![Stage::Along, Stage::Around]);
}
