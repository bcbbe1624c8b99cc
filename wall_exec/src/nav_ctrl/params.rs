//! Navigation control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::motion::MotionLimits;
use serde::{Deserialize, Serialize};
use util::maths::{heading_error_deg, norm_deg_360};

use super::NavError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the navigation maneuvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavCtrlParams {
    /// Separation between coaxial wheels.
    ///
    /// Units: centimeters
    pub wheel_separation_cm: f64,

    /// Drive speed used by the maneuvers.
    pub speed: i32,

    /// Ground speed of the vehicle when driving at `speed`.
    ///
    /// Units: centimeters/second
    pub rate_cm_s: f64,

    /// Rotor speed while scanning.
    pub scan_speed: i32,

    /// Wall clearance to approach and hold.
    ///
    /// Units: centimeters
    pub clearance_cm: f64,

    /// Forward coordinate of the wall's far end at which driving along the
    /// wall stops.
    ///
    /// Units: centimeters
    pub end_of_wall_cm: f64,

    /// Target of the arrival estimate of the wall's far end.
    ///
    /// Units: centimeters
    pub eta_target_cm: f64,

    /// Drive directions in the vehicle frame.
    ///
    /// Units: degrees
    pub dir_fwd_deg: f64,
    pub dir_left_deg: f64,
    pub dir_rev_deg: f64,
    pub dir_right_deg: f64,

    /// Gain from cross track error to drive direction when driving along a
    /// wall.
    ///
    /// Units: degrees/centimeter
    pub k_x: f64,

    /// Gain from wall angle error to spin trim when driving along a wall.
    pub k_a: f64,

    /// Largest correction of the drive direction from cross track error.
    ///
    /// Units: degrees
    pub max_direction_correction_deg: f64,

    /// An obstacle closer than this in the direction of travel stops the
    /// current maneuver.
    ///
    /// Units: centimeters
    pub stop_distance_cm: f64,

    /// Heading error below which a turn in place stops spinning.
    ///
    /// Units: degrees
    pub turn_stop_tolerance_deg: f64,

    /// Heading error below which a turn in place is complete once stopped.
    ///
    /// Units: degrees
    pub turn_done_tolerance_deg: f64,

    /// Added to the magnitude of the heading error to get the spin rate.
    pub turn_spin_bias: i32,

    /// Period between heading checks while turning.
    ///
    /// Units: seconds
    pub turn_poll_period_s: f64,

    /// Number of heading checks after which a turn is abandoned.
    pub max_turn_cycles: u64,

    /// Period of the steering loop while driving.
    ///
    /// Units: seconds
    pub drive_period_s: f64,

    /// Number of scans after which driving along a wall is abandoned.
    pub max_along_wall_cycles: u64,

    /// Low encoder value of the scans looking for the closest wall, lower than
    /// usual to see the wall beside and behind the vehicle.
    pub wall_scan_lev: i32,

    /// Continuity threshold of the closest wall scans.
    ///
    /// Units: percent
    pub wall_scan_gap: f64,

    /// Fit threshold of the closest wall scans.
    ///
    /// Units: centimeters
    pub wall_scan_fit: f64,

    /// Save every processed scan into the session.
    pub archive_scans: bool,

    /// Actuation limits applied to every command.
    pub limits: MotionLimits,
}

impl Default for NavCtrlParams {
    fn default() -> Self {
        Self {
            wheel_separation_cm: 34.0,
            speed: 150,
            rate_cm_s: 13.5,
            scan_speed: 200,
            clearance_cm: 40.0,
            end_of_wall_cm: 25.0,
            eta_target_cm: 10.0,
            dir_fwd_deg: 90.0,
            dir_left_deg: 180.0,
            dir_rev_deg: 270.0,
            dir_right_deg: 0.0,
            k_x: 1.0,
            k_a: 1.0,
            max_direction_correction_deg: 60.0,
            stop_distance_cm: 20.0,
            turn_stop_tolerance_deg: 2.0,
            turn_done_tolerance_deg: 3.0,
            turn_spin_bias: 40,
            turn_poll_period_s: 0.1,
            max_turn_cycles: 300,
            drive_period_s: 0.05,
            max_along_wall_cycles: 200,
            wall_scan_lev: 5000,
            wall_scan_gap: 10.0,
            wall_scan_fit: 5.0,
            archive_scans: true,
            limits: MotionLimits::default()
        }
    }
}

impl NavCtrlParams {
    /// Check the parameters the maneuvers divide by or loop on.
    ///
    /// The turn stop tolerance must be tighter than the done tolerance,
    /// otherwise a turn can settle between the two and never finish.
    pub fn validate(&self) -> Result<(), NavError> {
        let positive = [
            ("wheel_separation_cm", self.wheel_separation_cm),
            ("rate_cm_s", self.rate_cm_s),
            ("turn_stop_tolerance_deg", self.turn_stop_tolerance_deg),
        ];

        for &(name, value) in positive.iter() {
            if !(value > 0.0) {
                return Err(NavError::InvalidParam { name, value });
            }
        }

        if !(self.turn_done_tolerance_deg > self.turn_stop_tolerance_deg) {
            return Err(NavError::InvalidParam {
                name: "turn_done_tolerance_deg",
                value: self.turn_done_tolerance_deg
            });
        }

        Ok(())
    }

    /// The drive direction opposite to `direction_deg`.
    ///
    /// The named directions map onto each other, any other direction is
    /// turned through half a circle.
    ///
    /// Units: degrees
    pub fn opposite_deg(&self, direction_deg: f64) -> f64 {
        let pairs = [
            (self.dir_fwd_deg, self.dir_rev_deg),
            (self.dir_rev_deg, self.dir_fwd_deg),
            (self.dir_left_deg, self.dir_right_deg),
            (self.dir_right_deg, self.dir_left_deg),
        ];

        pairs
            .iter()
            .find(|(from, _)| heading_error_deg(direction_deg, *from).abs() < 1e-6)
            .map_or(norm_deg_360(direction_deg + 180.0), |(_, to)| *to)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(NavCtrlParams::default().validate().is_ok());
    }

    #[test]
    fn test_turn_tolerances() {
        let p = NavCtrlParams {
            turn_stop_tolerance_deg: 3.0,
            turn_done_tolerance_deg: 3.0,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(NavError::InvalidParam { name: "turn_done_tolerance_deg", .. })
        ));

        let p = NavCtrlParams {
            turn_stop_tolerance_deg: 0.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_bad_rate() {
        let p = NavCtrlParams {
            rate_cm_s: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(NavError::InvalidParam { name: "rate_cm_s", .. })
        ));
    }

    #[test]
    fn test_opposite_direction() {
        let p = NavCtrlParams::default();

        assert_eq!(p.opposite_deg(p.dir_left_deg), p.dir_right_deg);
        assert_eq!(p.opposite_deg(p.dir_fwd_deg), p.dir_rev_deg);
        assert_eq!(p.opposite_deg(360.0), p.dir_left_deg);
        assert!((p.opposite_deg(45.0) - 225.0).abs() < 1e-9);

        // A vehicle whose reverse is not straight back
        let p = NavCtrlParams {
            dir_rev_deg: 265.0,
            ..Default::default()
        };
        assert_eq!(p.opposite_deg(90.0), 265.0);
    }
}
