//! # Simulated vehicle
//!
//! A vehicle moving in a plane of straight walls, implementing the motion
//! and scan interfaces. Motion is integrated in real time from the last
//! command, so the vehicle keeps moving while the controller scans or
//! sleeps, as the real one does.
//!
//! The world frame has X east and Y north. Headings are compass headings,
//! clockwise from north.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::thread;
use std::time::Instant;

use comms_if::eqpt::{
    motion::{MotionInterface, ObstacleReadings},
    scan::{RawSample, ScanInterface},
    EqptError
};
use log::trace;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use util::{maths::norm_deg_360, time::seconds_to_std};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Longest integration step.
///
/// Units: seconds
const MAX_STEP_S: f64 = 0.005;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the simulated vehicle and its world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Walls as `[x1, y1, x2, y2]`.
    ///
    /// Units: centimeters
    pub walls: Vec<[f64; 4]>,

    /// Units: centimeters
    pub start_position: [f64; 2],

    /// Units: degrees
    pub start_heading_deg: f64,

    /// Ground speed per unit of commanded speed.
    ///
    /// Units: (centimeters/second)/speed
    pub speed_to_rate: f64,

    /// Turn rate per unit of commanded spin.
    ///
    /// Units: (degrees/second)/spin
    pub spin_to_rate: f64,

    /// Spin superimposed on a drive command which drives straight.
    pub drive_spin_bias: i32,

    /// Returns further than this read as no return.
    ///
    /// Units: centimeters
    pub max_range_cm: f64,

    /// Encoder counts between samples of a scan.
    pub encoder_step: i32,

    /// Encoder count looking straight left.
    pub enc_left: i32,

    /// Encoder count looking straight right.
    pub enc_right: i32,

    /// Time taken by one scan.
    ///
    /// Units: seconds
    pub scan_duration_s: f64,
}

/// The simulated vehicle.
#[derive(Debug)]
pub struct SimCar {
    params: SimParams,

    position: Point2<f64>,

    /// Units: degrees
    heading_deg: f64,

    cmd: MotionCmd,

    last_update: Instant,
}

/// The motion command being executed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum MotionCmd {
    Stopped,
    Drive {
        speed: i32,
        direction_deg: f64,
        spin: i32
    },
    Spin(i32),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            walls: vec![
                [-200.0, -200.0, -200.0, 300.0],
                [-200.0, 300.0, 300.0, 300.0],
                [300.0, 300.0, 300.0, -200.0],
                [300.0, -200.0, -200.0, -200.0],
            ],
            start_position: [-100.0, 0.0],
            start_heading_deg: 0.0,
            speed_to_rate: 13.5 / 150.0,
            spin_to_rate: 1.0,
            drive_spin_bias: 8,
            max_range_cm: 1200.0,
            encoder_step: 100,
            enc_left: 10000,
            enc_right: 30000,
            scan_duration_s: 0.0
        }
    }
}

impl SimCar {
    pub fn new(params: SimParams) -> Self {
        Self {
            position: Point2::new(params.start_position[0], params.start_position[1]),
            heading_deg: norm_deg_360(params.start_heading_deg),
            params,
            cmd: MotionCmd::Stopped,
            last_update: Instant::now()
        }
    }

    /// Current position, after bringing the simulation up to date.
    pub fn position(&mut self) -> Point2<f64> {
        self.advance();
        self.position
    }

    /// Current heading, after bringing the simulation up to date.
    ///
    /// Units: degrees
    pub fn true_heading(&mut self) -> f64 {
        self.advance();
        self.heading_deg
    }

    /// Range to the nearest wall along a direction in the vehicle frame, if
    /// within the maximum range.
    pub fn range_at(&self, vehicle_angle_rad: f64) -> Option<f64> {
        let world_angle = vehicle_angle_rad - self.heading_deg.to_radians();
        let dir = Vector2::new(world_angle.cos(), world_angle.sin());

        self.params.walls
            .iter()
            .filter_map(|w| {
                ray_hit(
                    &self.position,
                    &dir,
                    &Point2::new(w[0], w[1]),
                    &Point2::new(w[2], w[3])
                )
            })
            .fold(None, |best: Option<f64>, t| Some(best.map_or(t, |b| b.min(t))))
            .filter(|r| *r <= self.params.max_range_cm)
    }

    /// Integrate the current command up to now.
    fn advance(&mut self) {
        let now = Instant::now();
        let mut remaining = now.duration_since(self.last_update).as_secs_f64();
        self.last_update = now;

        let (velocity, turn_rate) = match self.cmd {
            MotionCmd::Stopped => (None, 0.0),
            MotionCmd::Drive { speed, direction_deg, spin } => (
                Some((speed as f64 * self.params.speed_to_rate, direction_deg)),
                -((spin - self.params.drive_spin_bias) as f64) * self.params.spin_to_rate
            ),
            MotionCmd::Spin(rate) => (None, -(rate as f64) * self.params.spin_to_rate)
        };

        while remaining > 0.0 {
            let dt = remaining.min(MAX_STEP_S);
            remaining -= dt;

            self.heading_deg = norm_deg_360(self.heading_deg + turn_rate * dt);

            if let Some((rate, direction_deg)) = velocity {
                let world_angle = (direction_deg - self.heading_deg).to_radians();
                self.position += Vector2::new(world_angle.cos(), world_angle.sin()) * rate * dt;
            }
        }
    }

    fn command(&mut self, cmd: MotionCmd) -> ObstacleReadings {
        self.advance();
        self.cmd = cmd;
        trace!("Sim command {:?} at {:?}, {:.1} deg", cmd, self.position, self.heading_deg);
        self.obstacles()
    }

    fn obstacles(&self) -> ObstacleReadings {
        use std::f64::consts::{FRAC_PI_2, PI};

        ObstacleReadings {
            front_cm: self.range_at(FRAC_PI_2),
            left_cm: self.range_at(PI),
            right_cm: self.range_at(0.0)
        }
    }
}

impl MotionInterface for SimCar {
    fn drive(&mut self, speed: i32, direction_deg: f64, spin: i32) -> Result<ObstacleReadings, EqptError> {
        Ok(self.command(MotionCmd::Drive { speed, direction_deg, spin }))
    }

    fn spin(&mut self, rate: i32) -> Result<ObstacleReadings, EqptError> {
        Ok(self.command(MotionCmd::Spin(rate)))
    }

    fn stop_wheels(&mut self) -> Result<ObstacleReadings, EqptError> {
        Ok(self.command(MotionCmd::Stopped))
    }

    fn heading(&mut self) -> Result<f64, EqptError> {
        Ok(self.true_heading())
    }
}

impl ScanInterface for SimCar {
    fn scan(&mut self, _speed: i32, lev: i32, hev: i32) -> Result<Vec<RawSample>, EqptError> {
        self.advance();

        let step = self.params.encoder_step.max(1);
        let span = (self.params.enc_right - self.params.enc_left) as f64;

        // Samples lie strictly inside the window
        let samples = (lev + step..hev)
            .step_by(step as usize)
            .map(|enc| {
                let theta = (self.params.enc_right - enc) as f64 * std::f64::consts::PI / span;
                RawSample {
                    encoder_count: enc,
                    distance_cm: self.range_at(theta).map_or(0, |r| r.round() as i32),
                    bytes_waiting: 9,
                    delta_time_s: 0.0
                }
            })
            .collect();

        if self.params.scan_duration_s > 0.0 {
            thread::sleep(seconds_to_std(self.params.scan_duration_s));
        }

        Ok(samples)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Distance along a ray of unit direction `dir` from `origin` to the segment
/// `a`-`b`, if they meet.
fn ray_hit(
    origin: &Point2<f64>,
    dir: &Vector2<f64>,
    a: &Point2<f64>,
    b: &Point2<f64>
) -> Option<f64> {
    let seg = b - a;
    let denom = dir.perp(&seg);
    if denom.abs() < 1e-12 {
        return None;
    }

    let ao = a - origin;
    let t = ao.perp(&seg) / denom;
    let s = ao.perp(dir) / denom;

    if t >= 0.0 && (0.0..=1.0).contains(&s) {
        Some(t)
    }
    else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};
    use std::time::Duration;

    fn wall_ahead() -> SimParams {
        SimParams {
            walls: vec![[-500.0, 100.0, 500.0, 100.0]],
            start_position: [0.0, 0.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_ray_hit() {
        let o = Point2::new(0.0, 0.0);
        let a = Point2::new(-10.0, 50.0);
        let b = Point2::new(10.0, 50.0);

        let t = ray_hit(&o, &Vector2::new(0.0, 1.0), &a, &b).unwrap();
        assert!((t - 50.0).abs() < 1e-9);
        assert!(ray_hit(&o, &Vector2::new(0.0, -1.0), &a, &b).is_none());
        assert!(ray_hit(&o, &Vector2::new(1.0, 0.0), &a, &b).is_none());
    }

    #[test]
    fn test_ranges_follow_heading() {
        let mut car = SimCar::new(wall_ahead());
        assert!((car.range_at(FRAC_PI_2).unwrap() - 100.0).abs() < 1e-9);
        assert!(car.range_at(PI).is_none());

        // Facing east the wall is on the left
        car.heading_deg = 90.0;
        assert!((car.range_at(PI).unwrap() - 100.0).abs() < 1e-9);
        assert!(car.obstacles().front_cm.is_none());
    }

    #[test]
    fn test_scan_window() {
        let mut car = SimCar::new(wall_ahead());
        let samples = car.scan(200, 10000, 30000).unwrap();

        assert_eq!(samples.len(), 199);
        assert!(samples.iter().all(|s| 10000 < s.encoder_count && s.encoder_count < 30000));
        assert_eq!(samples[0].encoder_count, 10100);
        assert_eq!(samples[198].encoder_count, 29900);

        assert_eq!(samples[99].encoder_count, 20000);
        assert_eq!(samples[99].distance_cm, 100);
        // Almost straight left runs out of range along the wall
        assert_eq!(samples[0].distance_cm, 0);
    }

    #[test]
    fn test_drive_and_spin() {
        let mut car = SimCar::new(SimParams {
            speed_to_rate: 1.0,
            spin_to_rate: 100.0,
            ..wall_ahead()
        });

        // Straight ahead with the bias spin
        car.drive(100, 90.0, 8).unwrap();
        thread::sleep(Duration::from_millis(200));
        car.stop_wheels().unwrap();

        let p = car.position();
        assert!(p.y > 10.0);
        assert!(p.x.abs() < 1e-6);
        assert!(car.true_heading().abs() < 1e-9);

        // Positive spin turns anticlockwise
        car.spin(1).unwrap();
        thread::sleep(Duration::from_millis(100));
        car.stop_wheels().unwrap();
        let h = car.true_heading();
        assert!(h > 180.0 && h < 359.0, "heading {}", h);
    }
}
