//! Steering control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the steering controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteerCtrlParams {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain, applied to the mean of the error window
    pub k_i: f64,

    /// Derivative gain
    pub k_d: f64,

    /// Spin trim at which the vehicle drives straight. Also the initial trim
    /// of every maneuver.
    pub base_trim: i32,

    /// Number of errors held for the integral term
    pub window_size: usize,

    /// Value every slot of the error window starts with.
    ///
    /// Units: degrees
    pub window_seed: f64,
}

impl Default for SteerCtrlParams {
    fn default() -> Self {
        Self {
            k_p: 0.2,
            k_i: 0.15,
            k_d: 0.4,
            base_trim: 8,
            window_size: 6,
            window_seed: 1.0
        }
    }
}
