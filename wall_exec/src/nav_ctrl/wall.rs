//! Wall relative maneuvers

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use util::maths::clamp;

use crate::eta::ArrivalEstimator;
use crate::scan_proc::LineParams;

use super::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Result of driving along a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlongWallResult {
    pub outcome: MnvrOutcome,

    /// Last measured distance to the wall, which sizes the turn round its
    /// end.
    ///
    /// Units: centimeters
    pub wall_distance_cm: f64,

    /// Sequence number of the last scan taken.
    pub last_scan: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C> NavCtrl<C>
where
    C: MotionInterface + ScanInterface
{
    /// Scan and return the line parameters of the longest segment of the
    /// closest wall.
    pub fn closest_wall(&mut self, nmbr: u32) -> Result<LineParams, NavError> {
        let params = self.scan_params.with_overrides(
            Some(self.params.wall_scan_lev),
            Some(self.params.wall_scan_gap),
            Some(self.params.wall_scan_fit)
        );

        let line = self.scan_with(nmbr, params)?
            .closest_line()
            .ok_or(NavError::NoWallFound(nmbr))?;

        debug!(
            "Closest wall: distance {:.1} cm, angle {:.1} deg, length {:.1} cm",
            line.origin_distance, line.angle_deg, line.length
        );

        Ok(line)
    }

    /// Turn in place so the closest wall runs parallel to the direction of
    /// travel.
    pub fn align_to_wall(&mut self, nmbr: u32) -> Result<(), NavError> {
        self.turn_to_wall(nmbr, 90.0)
    }

    /// Turn in place to face the closest wall squarely.
    pub fn square_to_wall(&mut self, nmbr: u32) -> Result<(), NavError> {
        self.turn_to_wall(nmbr, 0.0)
    }

    /// Drive in `direction_deg` until the closest wall is at `clearance_cm`.
    ///
    /// Travel time is predicted from the measured distance and the vehicle's
    /// ground rate. Approaching holds the current heading, backing away from
    /// a wall which is already too close applies the base trim.
    pub fn approach_wall(
        &mut self,
        direction_deg: f64,
        speed: i32,
        clearance_cm: f64,
        nmbr: u32
    ) -> Result<MnvrOutcome, NavError> {
        let dist = self.closest_wall(nmbr)?.origin_distance;
        let rate = self.params.rate_cm_s;

        if dist > clearance_cm {
            let duration_s = (dist - clearance_cm) / rate;
            let target = self.heading()?;
            info!(
                "Approaching wall from {:.1} cm to {:.1} cm, {:.1} s at heading {:.1} deg",
                dist, clearance_cm, duration_s, target
            );

            let steer = SteerCtrl::new(target, &self.steer_params);
            self.drive_for(speed, direction_deg, duration_s, Some(steer))
        }
        else if dist < clearance_cm {
            let duration_s = (clearance_cm - dist) / rate;
            info!(
                "Backing away from wall from {:.1} cm to {:.1} cm, {:.1} s",
                dist, clearance_cm, duration_s
            );

            let away_deg = self.params.opposite_deg(direction_deg);
            self.drive_for(speed, away_deg, duration_s, None)
        }
        else {
            info!("Already at {:.1} cm from wall", dist);
            Ok(MnvrOutcome::Complete)
        }
    }

    /// Drive forward along the wall on the left, holding the clearance.
    ///
    /// Every cycle rescans the wall. The drive direction is corrected by the
    /// cross track error, the spin by the wall's angle. The cycle ends when
    /// the far end of the wall comes alongside, as predicted by an arrival
    /// estimate of its forward coordinate.
    pub fn drive_along_wall_on_left(
        &mut self,
        speed: i32,
        clearance_cm: f64,
        nmbr: u32
    ) -> Result<AlongWallResult, NavError> {
        let mut nmbr = nmbr;
        let line = self.closest_wall(nmbr)?;

        let mut wall_distance_cm = line.origin_distance;
        let mut end_of_wall = line.endpoints.1.y;
        info!("Driving along wall on left, end of wall at {:.1} cm", end_of_wall);

        let mut eta = ArrivalEstimator::new(end_of_wall, self.params.eta_target_cm);
        let mut outcome = MnvrOutcome::Complete;
        let mut cycles = 0;

        while end_of_wall > self.params.end_of_wall_cm {
            if cycles >= self.params.max_along_wall_cycles {
                warn!("Wall did not end after {} scans", cycles);
                break;
            }
            cycles += 1;

            nmbr += 1;
            let line = self.closest_wall(nmbr)?;
            wall_distance_cm = line.origin_distance;
            end_of_wall = line.endpoints.1.y;

            let max_corr = self.params.max_direction_correction_deg;
            let cross_track_error = wall_distance_cm - clearance_cm;
            let direction = self.params.dir_fwd_deg
                + clamp(&(self.params.k_x * cross_track_error), &-max_corr, &max_corr);

            let trim = (self.params.k_a * (line.angle_deg - 90.0)).round() as i32;
            let spin = trim + self.steer_params.base_trim;

            let readings = self.drive(speed, direction, spin)?;
            debug!(
                "Dist: {:.1}, Angle: {:.2}, EOW: {:.2}, Trim: {}",
                wall_distance_cm, line.angle_deg, end_of_wall, trim
            );

            if let Some(o) = self.check_obstacle(&readings, direction) {
                outcome = MnvrOutcome::Interrupted(o);
                break;
            }

            // A negative estimate short of the target means the end of the
            // wall appeared to move away, which scan quantisation can cause
            if let Some(arrival) = eta.update(end_of_wall) {
                let passed = end_of_wall <= eta.target();
                if passed || (arrival.eta_s >= 0.0 && arrival.remaining_updates <= 0) {
                    wait(arrival.eta_s);
                    debug!("At end of wall");
                    break;
                }
            }
        }

        self.stop()?;

        // Final look at the wall for the archive
        nmbr += 1;
        match self.closest_wall(nmbr) {
            Ok(line) => debug!("Final scan {}: {:?}", nmbr, line),
            Err(NavError::NoWallFound(_)) => debug!("Final scan {}: no wall", nmbr),
            Err(e) => return Err(e)
        }

        Ok(AlongWallResult {
            outcome,
            wall_distance_cm,
            last_scan: nmbr
        })
    }

    fn turn_to_wall(&mut self, nmbr: u32, wall_angle_deg: f64) -> Result<(), NavError> {
        let line = self.closest_wall(nmbr)?;
        let heading = self.heading()?;

        let target = heading - line.angle_deg + wall_angle_deg;
        debug!(
            "Wall angle {:.1} deg, heading {:.1} deg, target {:.1} deg",
            line.angle_deg, heading, target
        );

        self.turn_to(target)
    }
}
