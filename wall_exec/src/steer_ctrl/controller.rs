//! Heading hold controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::Serialize;
use util::{
    archive::{ArchiveError, Archiver},
    maths::heading_error_deg,
    session
};

use super::{RollingWindow, SteerCtrlParams};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Steering controller holding a target heading.
///
/// One controller lives for one maneuver.
#[derive(Debug, Clone)]
pub struct SteerCtrl {
    params: SteerCtrlParams,

    /// Units: degrees
    target_deg: f64,

    /// Units: degrees
    prev_error_deg: f64,

    errors: RollingWindow,

    trim: i32,

    report: SteerReport,
}

/// The values of one controller cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SteerReport {
    /// Session time of the cycle, zero without a session
    pub time_s: f64,
    pub heading_deg: f64,
    pub target_deg: f64,
    pub error_deg: f64,
    pub p_term: f64,
    pub i_term: f64,
    pub d_term: f64,
    pub trim: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SteerCtrl {
    /// Create a controller for the given target heading in degrees.
    pub fn new(target_deg: f64, params: &SteerCtrlParams) -> Self {
        Self {
            params: *params,
            target_deg,
            prev_error_deg: 0.0,
            errors: RollingWindow::new(params.window_size, params.window_seed),
            trim: params.base_trim,
            report: SteerReport {
                target_deg,
                trim: params.base_trim,
                ..Default::default()
            }
        }
    }

    pub fn target_deg(&self) -> f64 {
        self.target_deg
    }

    /// The current trim, without running a cycle.
    pub fn trim(&self) -> i32 {
        self.trim
    }

    /// The values of the last cycle.
    pub fn report(&self) -> &SteerReport {
        &self.report
    }

    /// Run one cycle with the measured heading and return the new trim.
    ///
    /// A positive error, heading clockwise of the target, raises the trim,
    /// turning the vehicle anticlockwise.
    pub fn update(&mut self, heading_deg: f64) -> i32 {
        let error = heading_error_deg(heading_deg, self.target_deg);

        let p_term = error * self.params.k_p;

        self.errors.push(error);
        let i_term = self.errors.mean() * self.params.k_i;

        let d_term = (error - self.prev_error_deg) * self.params.k_d;
        self.prev_error_deg = error;

        self.trim += (p_term + i_term + d_term).round() as i32;

        debug!(
            "P-term: {:.2}, I-term: {:.2}, D-term: {:.2}, Trim: {}, HDG-Error: {:.1}",
            p_term, i_term, d_term, self.trim, error
        );

        self.report = SteerReport {
            time_s: session::try_get_elapsed_seconds().unwrap_or(0.0),
            heading_deg,
            target_deg: self.target_deg,
            error_deg: error,
            p_term,
            i_term,
            d_term,
            trim: self.trim
        };

        self.trim
    }

    /// Write the report of the last cycle into an archive.
    pub fn archive(&self, archiver: &mut Archiver) -> Result<(), ArchiveError> {
        archiver.serialise(self.report)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_on_target_holds_base_trim() {
        let params = SteerCtrlParams::default();
        let mut ctrl = SteerCtrl::new(120.0, &params);

        for _ in 0..=params.window_size {
            assert_eq!(ctrl.update(120.0), params.base_trim);
        }
        assert_eq!(ctrl.trim(), params.base_trim);
    }

    #[test]
    fn test_trim_accumulates() {
        let params = SteerCtrlParams::default();
        let mut ctrl = SteerCtrl::new(90.0, &params);

        // First cycle: p = 2, i = mean(10,1,1,1,1,1) * 0.15 = 0.375, d = 4
        assert_eq!(ctrl.update(100.0), 8 + 6);
        let r = *ctrl.report();
        assert!((r.p_term - 2.0).abs() < 1e-9);
        assert!((r.i_term - 0.375).abs() < 1e-9);
        assert!((r.d_term - 4.0).abs() < 1e-9);

        // Second cycle: p = 2, i = mean(10,10,1,1,1,1) * 0.15 = 0.6, d = 0
        assert_eq!(ctrl.update(100.0), 14 + 3);
    }

    #[test]
    fn test_heading_wraps() {
        let params = SteerCtrlParams::default();
        let mut ctrl = SteerCtrl::new(355.0, &params);

        // 5 is 10 degrees clockwise of 355, not 350 anticlockwise
        ctrl.update(5.0);
        assert!((ctrl.report().error_deg - 10.0).abs() < 1e-9);
        assert!(ctrl.trim() > params.base_trim);
    }

    #[test]
    fn test_negative_error_lowers_trim() {
        let params = SteerCtrlParams::default();
        let mut ctrl = SteerCtrl::new(90.0, &params);

        assert!(ctrl.update(80.0) < params.base_trim);
    }
}
