//! # Arrival estimator
//!
//! Predicts when a monitored value, updated once per control cycle, will
//! reach a target, by extrapolating the rate of change seen since the last
//! update.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::Instant;
use log::{debug, warn};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Estimator state, scoped to one maneuver.
#[derive(Debug, Clone, Copy)]
pub struct ArrivalEstimator {
    target: f64,
    initial_value: f64,
    prev_value: f64,
    prev_time: Instant,
}

/// Prediction from one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    /// Number of whole update periods, of the length of the last one, before
    /// the target is reached. Negative once the target has been passed or if
    /// the value is moving away from it.
    pub remaining_updates: i64,

    /// Predicted time to the target.
    ///
    /// Units: seconds
    pub eta_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArrivalEstimator {
    /// Start estimating from the current value, now.
    pub fn new(initial_value: f64, target: f64) -> Self {
        Self::new_at(initial_value, target, Instant::now())
    }

    /// Start estimating from the current value at the given instant.
    pub fn new_at(initial_value: f64, target: f64, time: Instant) -> Self {
        Self {
            target,
            initial_value,
            prev_value: initial_value,
            prev_time: time
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Update with a value measured now.
    pub fn update(&mut self, value: f64) -> Option<Arrival> {
        self.update_at(value, Instant::now())
    }

    /// Update with a value measured at the given instant.
    ///
    /// Returns `None` if no progress can be measured since the previous
    /// update, either because the value did not change or no time passed.
    /// The previous value is then kept so the next update measures over the
    /// longer interval.
    pub fn update_at(&mut self, value: f64, time: Instant) -> Option<Arrival> {
        let dt = time.saturating_duration_since(self.prev_time).as_secs_f64();

        // Progress and remaining distance, both positive when approaching
        let (delta, remaining) = if self.initial_value > self.target {
            (self.prev_value - value, value - self.target)
        }
        else if self.initial_value < self.target {
            (value - self.prev_value, self.target - value)
        }
        else {
            return Some(Arrival {
                remaining_updates: 0,
                eta_s: 0.0
            });
        };

        if delta == 0.0 || dt <= 0.0 {
            warn!(
                "No measurable progress towards {} (value {}, dt {:.3} s)",
                self.target, value, dt
            );
            return None;
        }

        let slope = dt / delta;
        let eta_s = remaining * slope;
        let remaining_updates = (eta_s / dt).floor() as i64;

        self.prev_value = value;
        self.prev_time = time;

        debug!("ETA: {:.2} s, {} updates remaining", eta_s, remaining_updates);

        Some(Arrival {
            remaining_updates,
            eta_s
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_steady_approach_from_above() {
        let t0 = Instant::now();
        let mut eta = ArrivalEstimator::new_at(100.0, 0.0, t0);

        let mut remaining = Vec::new();
        for (n, v) in [80.0, 60.0, 40.0].iter().enumerate() {
            let a = eta.update_at(*v, t0 + Duration::from_secs(n as u64 + 1)).unwrap();
            assert!((a.eta_s - v / 20.0).abs() < 1e-9);
            remaining.push(a.remaining_updates);
        }

        assert_eq!(remaining, vec![4, 3, 2]);
    }

    #[test]
    fn test_approach_from_below() {
        let t0 = Instant::now();
        let mut eta = ArrivalEstimator::new_at(0.0, 50.0, t0);

        let a = eta.update_at(10.0, t0 + Duration::from_millis(500)).unwrap();
        assert!((a.eta_s - 2.0).abs() < 1e-9);
        assert_eq!(a.remaining_updates, 4);
    }

    #[test]
    fn test_no_progress() {
        let t0 = Instant::now();
        let mut eta = ArrivalEstimator::new_at(100.0, 10.0, t0);

        assert!(eta.update_at(100.0, t0 + Duration::from_secs(1)).is_none());

        // Progress is then measured from the start
        let a = eta.update_at(90.0, t0 + Duration::from_secs(2)).unwrap();
        assert!((a.eta_s - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_passed_target() {
        let t0 = Instant::now();
        let mut eta = ArrivalEstimator::new_at(30.0, 10.0, t0);

        let a = eta.update_at(5.0, t0 + Duration::from_secs(1)).unwrap();
        assert!(a.eta_s < 0.0);
        assert!(a.remaining_updates < 0);
    }
}
