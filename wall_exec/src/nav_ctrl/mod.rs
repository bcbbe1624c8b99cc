//! # Navigation control module
//!
//! Sequences the maneuvers of the vehicle. Each maneuver blocks until it is
//! complete, reading sensors and writing motion commands in strict
//! alternation. The controller owns the vehicle's equipment handle for the
//! whole run.
//!
//! A maneuver stopped by an obstacle is not an error, it reports
//! [`MnvrOutcome::Interrupted`] and the caller carries on with its next step.
//! Errors are reserved for equipment failures and for situations in which
//! there is nothing sensible to do, such as a scan with no wall in it.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod follow;
mod params;
mod plan;
mod turn;
mod wall;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::thread;
use std::time::Instant;

use comms_if::eqpt::{
    motion::{MotionInterface, ObstacleReadings},
    scan::ScanInterface,
    EqptError
};
use log::{debug, info, warn};
use util::{archive::Archiver, maths::norm_deg_360, session, time::seconds_to_std};

use crate::scan_proc::{ProcessScan, ScanProcError, ScanProcParams};
use crate::steer_ctrl::{SteerCtrl, SteerCtrlParams};

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use follow::*;
pub use params::*;
pub use wall::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The navigation controller.
pub struct NavCtrl<C>
where
    C: MotionInterface + ScanInterface
{
    car: C,

    params: NavCtrlParams,

    scan_params: ScanProcParams,

    steer_params: SteerCtrlParams,

    /// Per-cycle steering reports, disabled by default.
    steer_arch: Archiver,
}

/// Obstacle which stopped a maneuver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstruction {
    /// Direction of travel when stopped.
    ///
    /// Units: degrees
    pub direction_deg: f64,

    /// Units: centimeters
    pub range_cm: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The result of a maneuver which ran without error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MnvrOutcome {
    Complete,

    /// Stopped by an obstacle before completion.
    Interrupted(Obstruction),
}

/// Errors which can occur during a maneuver.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Equipment error: {0}")]
    EqptError(#[from] EqptError),

    #[error("Scan processing error: {0}")]
    ScanProcError(#[from] ScanProcError),

    #[error("Could not write archive: {0}")]
    ArchiveError(#[from] util::archive::ArchiveError),

    #[error("No wall found in scan {0}")]
    NoWallFound(u32),

    #[error("Fewer than two walls in scan {0}, no usable gap")]
    NoUsableGap(u32),

    #[error("No open sector found in scan {0}")]
    NoOpenSector(u32),

    #[error("Turn to {target_deg:.1} deg did not converge, heading error {error_deg:.1} deg")]
    TurnTimeout {
        target_deg: f64,
        error_deg: f64
    },

    #[error("Invalid turn radius {0} cm")]
    InvalidTurnRadius(f64),

    #[error("Invalid navigation parameter {name} = {value}")]
    InvalidParam {
        name: &'static str,
        value: f64
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C> NavCtrl<C>
where
    C: MotionInterface + ScanInterface
{
    /// Create a new controller owning the vehicle.
    pub fn new(
        car: C,
        params: NavCtrlParams,
        scan_params: ScanProcParams,
        steer_params: SteerCtrlParams
    ) -> Self {
        Self {
            car,
            params,
            scan_params,
            steer_params,
            steer_arch: Archiver::default()
        }
    }

    /// Archive the steering controller's reports.
    pub fn with_steer_archiver(mut self, archiver: Archiver) -> Self {
        self.steer_arch = archiver;
        self
    }

    pub fn params(&self) -> &NavCtrlParams {
        &self.params
    }

    pub fn car(&self) -> &C {
        &self.car
    }

    /// Give back the vehicle.
    pub fn into_car(self) -> C {
        self.car
    }

    /// Current compass heading.
    ///
    /// Units: degrees, `[0, 360)`
    pub fn heading(&mut self) -> Result<f64, NavError> {
        Ok(norm_deg_360(self.car.heading()?))
    }

    /// Scan and process with the default scan parameters.
    pub fn scan(&mut self, nmbr: u32) -> Result<ProcessScan, NavError> {
        let params = self.scan_params;
        self.scan_with(nmbr, params)
    }

    /// Scan and process with the given parameters, archiving the result if
    /// enabled.
    pub fn scan_with(&mut self, nmbr: u32, params: ScanProcParams) -> Result<ProcessScan, NavError> {
        params.validate()?;

        let samples = self.car.scan(self.params.scan_speed, params.lev, params.hev)?;
        debug!("Scan {} returned {} samples", nmbr, samples.len());

        let scan = ProcessScan::new(&samples, params)?;

        if self.params.archive_scans && session::is_active() {
            let archive = scan.to_archive(nmbr);
            session::save(archive.file_name(), archive);
        }

        Ok(scan)
    }

    /// Stop the wheels, logging any obstacle readings at debug.
    pub fn stop(&mut self) -> Result<(), NavError> {
        let readings = self.car.stop_wheels()?;
        debug!("Stopped, obstacles: {:?}", readings);
        Ok(())
    }

    /// Drive forward for `cycles` steering cycles holding the current heading.
    pub fn pid_steer_test(&mut self, cycles: u64) -> Result<MnvrOutcome, NavError> {
        let target = self.heading()?;
        info!("Steering test: {} cycles holding {:.1} deg", cycles, target);

        let mut steer = SteerCtrl::new(target, &self.steer_params);
        let direction = self.params.dir_fwd_deg;

        for _ in 0..cycles {
            let trim = self.steer_cycle(&mut steer)?;
            let readings = self.drive(self.params.speed, direction, trim)?;
            if let Some(o) = self.check_obstacle(&readings, direction) {
                self.stop()?;
                return Ok(MnvrOutcome::Interrupted(o));
            }
            wait(self.params.drive_period_s);
        }

        self.stop()?;
        Ok(MnvrOutcome::Complete)
    }

    // -----------------------------------------------------------------------
    // Helpers shared by the maneuvers
    // -----------------------------------------------------------------------

    /// Send a governed drive command.
    fn drive(&mut self, speed: i32, direction_deg: f64, spin: i32) -> Result<ObstacleReadings, NavError> {
        let (speed, spin) = self.params.limits.govern_drive(speed, spin);
        Ok(self.car.drive(speed, norm_deg_360(direction_deg), spin)?)
    }

    /// Send a governed spin command.
    fn spin(&mut self, rate: i32) -> Result<ObstacleReadings, NavError> {
        let rate = self.params.limits.govern_spin(rate);
        Ok(self.car.spin(rate)?)
    }

    /// Read the heading and run one steering cycle, archiving the report.
    fn steer_cycle(&mut self, steer: &mut SteerCtrl) -> Result<i32, NavError> {
        let heading = self.heading()?;
        let trim = steer.update(heading);
        steer.archive(&mut self.steer_arch)?;
        Ok(trim)
    }

    /// The obstruction in the direction of travel, if it is too close.
    fn check_obstacle(&self, readings: &ObstacleReadings, direction_deg: f64) -> Option<Obstruction> {
        match readings.in_direction(direction_deg) {
            Some(range_cm) if range_cm < self.params.stop_distance_cm => {
                warn!(
                    "Obstacle at {:.1} cm in direction {:.0} deg, stopping",
                    range_cm, direction_deg
                );
                Some(Obstruction {
                    direction_deg,
                    range_cm
                })
            },
            _ => None
        }
    }

    /// Drive in a direction for a fixed time.
    ///
    /// With a steering controller the heading is held, without one the base
    /// trim is applied open loop. Stops the wheels on return.
    fn drive_for(
        &mut self,
        speed: i32,
        direction_deg: f64,
        duration_s: f64,
        mut steer: Option<SteerCtrl>
    ) -> Result<MnvrOutcome, NavError> {
        let start = Instant::now();
        let duration = seconds_to_std(duration_s);

        while start.elapsed() < duration {
            let trim = match steer.as_mut() {
                Some(s) => self.steer_cycle(s)?,
                None => self.steer_params.base_trim
            };

            let readings = self.drive(speed, direction_deg, trim)?;
            if let Some(o) = self.check_obstacle(&readings, direction_deg) {
                self.stop()?;
                return Ok(MnvrOutcome::Interrupted(o));
            }

            let remaining = duration.checked_sub(start.elapsed()).unwrap_or_default();
            thread::sleep(remaining.min(seconds_to_std(self.params.drive_period_s)));
        }

        self.stop()?;
        Ok(MnvrOutcome::Complete)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn wait(seconds: f64) {
    if seconds > 0.0 {
        thread::sleep(seconds_to_std(seconds));
    }
}
