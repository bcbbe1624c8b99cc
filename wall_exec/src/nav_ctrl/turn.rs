//! Turning maneuvers

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use util::maths::{heading_error_deg, norm_deg_360};

use super::*;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C> NavCtrl<C>
where
    C: MotionInterface + ScanInterface
{
    /// Signed error from the current heading to the target, positive when the
    /// heading is clockwise of the target.
    ///
    /// Units: degrees
    pub fn heading_error(&mut self, target_deg: f64) -> Result<f64, NavError> {
        let heading = self.heading()?;
        Ok(heading_error_deg(heading, target_deg))
    }

    /// Turn in place to the target heading.
    ///
    /// Spins towards the target, faster the further away it is, until within
    /// the stop tolerance, then stops and checks the heading again. Overshoot
    /// past the done tolerance starts another round.
    pub fn turn_to(&mut self, target_deg: f64) -> Result<(), NavError> {
        self.params.validate()?;

        let target_deg = norm_deg_360(target_deg);
        info!("Turning to {:.1} deg", target_deg);

        let mut cycles = 0;
        let mut error = self.heading_error(target_deg)?;

        loop {
            while error.abs() > self.params.turn_stop_tolerance_deg {
                if cycles >= self.params.max_turn_cycles {
                    self.stop()?;
                    return Err(NavError::TurnTimeout {
                        target_deg,
                        error_deg: error
                    });
                }
                cycles += 1;

                let bias = self.params.turn_spin_bias as f64;
                let rate = if error > 0.0 { error + bias } else { error - bias };
                self.spin(rate.round() as i32)?;

                wait(self.params.turn_poll_period_s);
                error = self.heading_error(target_deg)?;
                debug!("Relative heading error: {:.1} deg", error);
            }

            self.stop()?;

            error = self.heading_error(target_deg)?;
            if error.abs() < self.params.turn_done_tolerance_deg {
                info!("Turn complete, heading error {:.1} deg", error);
                return Ok(());
            }
        }
    }

    /// Turn by `angle_deg`, positive anticlockwise, on a circle of the given
    /// radius while driving in `direction_deg`.
    ///
    /// The spin is fixed by the radius and speed, the turn ends when the
    /// heading reaches or passes the target.
    pub fn radius_turn_on_the_go(
        &mut self,
        speed: i32,
        direction_deg: f64,
        angle_deg: f64,
        radius_cm: f64
    ) -> Result<(), NavError> {
        if !(radius_cm > 0.0) {
            return Err(NavError::InvalidTurnRadius(radius_cm));
        }

        let spin_ratio = (self.params.wheel_separation_cm / 2.0 / radius_cm)
            / std::f64::consts::SQRT_2;
        let spin = (speed as f64 * spin_ratio).round() as i32;

        let target_deg = norm_deg_360(self.heading()? - angle_deg);
        info!(
            "Turning {:.0} deg on a {:.1} cm radius to {:.1} deg",
            angle_deg, radius_cm, target_deg
        );

        let start_error = self.heading_error(target_deg)?;
        let side = start_error.signum();
        if start_error == 0.0 {
            return Ok(());
        }

        // Positive error needs an anticlockwise, positive, spin
        let spin = if side > 0.0 { spin } else { -spin };

        self.drive(speed, direction_deg, spin)?;

        let mut cycles = 0;
        loop {
            wait(self.params.turn_poll_period_s);
            let error = self.heading_error(target_deg)?;

            if error.signum() != side || error == 0.0 {
                break;
            }

            if cycles >= self.params.max_turn_cycles {
                self.stop()?;
                return Err(NavError::TurnTimeout {
                    target_deg,
                    error_deg: error
                });
            }
            cycles += 1;
        }

        self.stop()
    }
}
