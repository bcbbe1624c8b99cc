//! # Motion Equipment Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::EqptError;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Ranges to the nearest obstacle reported by the proximity sensors after each motion command.
///
/// Not every vehicle carries all three sensors, an unfitted or silent sensor reads `None`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct ObstacleReadings {
    /// Range to the nearest obstacle ahead.
    ///
    /// Units: centimeters
    pub front_cm: Option<f64>,

    /// Range to the nearest obstacle on the left.
    ///
    /// Units: centimeters
    pub left_cm: Option<f64>,

    /// Range to the nearest obstacle on the right.
    ///
    /// Units: centimeters
    pub right_cm: Option<f64>,
}

/// Physical actuation limits of the drive.
///
/// Commands outside these limits are saturated, never rejected.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MotionLimits {
    /// Largest speed magnitude accepted by the wheels.
    pub max_speed: i32,

    /// Largest spin magnitude superimposed on a drive command.
    pub max_drive_spin: i32,

    /// Largest spin rate magnitude for turning in place.
    pub max_spin_rate: i32,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Wheels and heading sensor of the vehicle.
///
/// Direction is in degrees in the vehicle frame: 0 is right, 90 is forward, 180 is left and 270 is
/// reverse. Positive spin turns the vehicle counter-clockwise, i.e. decreases the compass heading.
pub trait MotionInterface {
    /// Drive at `speed` in `direction_deg` while spinning at `spin`.
    fn drive(&mut self, speed: i32, direction_deg: f64, spin: i32)
        -> Result<ObstacleReadings, EqptError>;

    /// Turn in place at `rate`.
    fn spin(&mut self, rate: i32) -> Result<ObstacleReadings, EqptError>;

    /// Stop all wheels.
    fn stop_wheels(&mut self) -> Result<ObstacleReadings, EqptError>;

    /// Current compass heading in degrees, clockwise from north.
    fn heading(&mut self) -> Result<f64, EqptError>;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ObstacleReadings {
    /// The reading from the sensor facing closest to `direction_deg`.
    ///
    /// There is no rear sensor, so directions nearer to reverse than to any side give `None`.
    pub fn in_direction(&self, direction_deg: f64) -> Option<f64> {
        let d = direction_deg.rem_euclid(360.0);

        if d < 45.0 || d >= 315.0 {
            self.right_cm
        }
        else if d < 135.0 {
            self.front_cm
        }
        else if d < 225.0 {
            self.left_cm
        }
        else {
            None
        }
    }
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            max_speed: 240,
            max_drive_spin: 100,
            max_spin_rate: 255,
        }
    }
}

impl MotionLimits {
    /// Saturate a drive command's speed and spin.
    pub fn govern_drive(&self, speed: i32, spin: i32) -> (i32, i32) {
        (
            speed.clamp(-self.max_speed, self.max_speed),
            spin.clamp(-self.max_drive_spin, self.max_drive_spin),
        )
    }

    /// Saturate a turn in place rate.
    pub fn govern_spin(&self, rate: i32) -> i32 {
        rate.clamp(-self.max_spin_rate, self.max_spin_rate)
    }
}
