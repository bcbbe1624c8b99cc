//! Parameters for scan processing

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::ScanProcError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for scan processing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanProcParams {
    /// Low encoder value, start of the window of processed samples.
    pub lev: i32,

    /// High encoder value, end of the window of processed samples.
    pub hev: i32,

    /// Encoder count looking straight left, angle pi.
    pub enc_left: i32,

    /// Encoder count looking straight right, angle zero.
    pub enc_right: i32,

    /// Continuity threshold between adjacent points, as a percentage of the
    /// measured distance.
    ///
    /// Units: percent
    pub gap: f64,

    /// Threshold of the mean point to line distance for a good line fit.
    ///
    /// Units: centimeters
    pub fit: f64,

    /// Direction in which corners are searched for within a region.
    pub corner_strategy: CornerStrategy,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Direction of the greedy corner search.
///
/// The two directions can find different corners on the same region, as the
/// line grown from each end keeps going until the fit fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerStrategy {
    /// Grow lines from the low index end of each region.
    Forward,

    /// Grow lines from the high index end of each region.
    Reverse,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ScanProcParams {
    fn default() -> Self {
        Self {
            lev: 10000,
            hev: 30000,
            enc_left: 10000,
            enc_right: 30000,
            gap: 12.0,
            fit: 3.0,
            corner_strategy: CornerStrategy::Forward,
        }
    }
}

impl ScanProcParams {
    /// Check that the parameters describe a usable window and thresholds.
    pub fn validate(&self) -> Result<(), ScanProcError> {
        if self.lev >= self.hev {
            return Err(ScanProcError::InvalidWindow {
                lev: self.lev,
                hev: self.hev
            });
        }
        if self.enc_left == self.enc_right {
            return Err(ScanProcError::InvalidWindow {
                lev: self.enc_left,
                hev: self.enc_right
            });
        }
        if !(self.gap > 0.0) {
            return Err(ScanProcError::InvalidThreshold {
                name: "gap",
                value: self.gap
            });
        }
        if !(self.fit > 0.0) {
            return Err(ScanProcError::InvalidThreshold {
                name: "fit",
                value: self.fit
            });
        }

        Ok(())
    }

    /// Copy of these parameters with the window start and thresholds
    /// overridden where given.
    ///
    /// The angle calibration is kept, so a lower `lev` takes in points behind
    /// the left side of the vehicle.
    pub fn with_overrides(
        &self,
        lev: Option<i32>,
        gap: Option<f64>,
        fit: Option<f64>
    ) -> Self {
        Self {
            lev: lev.unwrap_or(self.lev),
            gap: gap.unwrap_or(self.gap),
            fit: fit.unwrap_or(self.fit),
            ..*self
        }
    }
}
