//! Scan points

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::scan::RawSample;
use nalgebra::Point2;
use serde::Serialize;
use util::{geom::polar_to_rect, maths::lin_map};

use super::ScanProcParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single measured point of a scan.
///
/// A distance of zero means the range-finder saw no return in that direction.
/// Such a point has neither an angle nor a position, callers must check
/// rather than assume a position at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    encoder_count: i32,

    distance_cm: f64,

    angle_rad: Option<f64>,

    position: Option<Point2<f64>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Point {
    /// Build a point from an encoder count and a measured distance.
    pub fn new(encoder_count: i32, distance_cm: f64, params: &ScanProcParams) -> Self {
        let angle_rad = if distance_cm != 0.0 {
            Some(encoder_to_rad(encoder_count, params))
        }
        else {
            None
        };

        let position = angle_rad.map(|theta| polar_to_rect(distance_cm, theta));

        Self {
            encoder_count,
            distance_cm,
            angle_rad,
            position
        }
    }

    /// Rotor encoder count at which the point was measured.
    pub fn encoder_count(&self) -> i32 {
        self.encoder_count
    }

    /// Measured distance, zero for no return.
    ///
    /// Units: centimeters
    pub fn distance_cm(&self) -> f64 {
        self.distance_cm
    }

    /// True if the range-finder saw a return.
    pub fn has_return(&self) -> bool {
        self.distance_cm != 0.0
    }

    /// Angle of the point in the vehicle frame, if it has a return.
    ///
    /// Units: radians
    pub fn angle_rad(&self) -> Option<f64> {
        self.angle_rad
    }

    /// Position of the point in the vehicle frame, if it has a return.
    ///
    /// Units: centimeters
    pub fn position(&self) -> Option<Point2<f64>> {
        self.position
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert an encoder count into an angle in the vehicle frame.
///
/// `enc_left` maps to pi (straight left), `enc_right` maps to 0 (straight
/// right). Counts outside that range extrapolate linearly.
///
/// Units: radians
pub fn encoder_to_rad(encoder_count: i32, params: &ScanProcParams) -> f64 {
    lin_map(
        (params.enc_right as f64, params.enc_left as f64),
        (0.0, std::f64::consts::PI),
        encoder_count as f64
    )
}

/// Build the points of one sweep, one per sample, in sample order.
pub fn generate_points(data: &[RawSample], params: &ScanProcParams) -> Vec<Point> {
    data.iter()
        .map(|s| Point::new(s.encoder_count, s.distance_cm as f64, params))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_encoder_to_rad() {
        let p = ScanProcParams::default();

        assert!((encoder_to_rad(10000, &p) - PI).abs() < 1e-12);
        assert!((encoder_to_rad(20000, &p) - PI / 2.0).abs() < 1e-12);
        assert!(encoder_to_rad(30000, &p).abs() < 1e-12);
    }

    #[test]
    fn test_point_ahead() {
        let p = Point::new(20000, 100.0, &ScanProcParams::default());
        let pos = p.position().unwrap();

        assert!(pos.x.abs() < 1e-9);
        assert!((pos.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_on_right_has_position() {
        // Angle zero is still a valid angle
        let p = Point::new(30000, 50.0, &ScanProcParams::default());
        assert_eq!(p.angle_rad(), Some(0.0));
        assert!((p.position().unwrap().x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_override_keeps_calibration() {
        let p = ScanProcParams::default().with_overrides(Some(5000), None, None);

        assert!((encoder_to_rad(20000, &p) - PI / 2.0).abs() < 1e-12);
        assert!((encoder_to_rad(5000, &p) - 1.25 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_no_return_sentinel() {
        let p = Point::new(15000, 0.0, &ScanProcParams::default());

        assert!(!p.has_return());
        assert_eq!(p.angle_rad(), None);
        assert_eq!(p.position(), None);
    }

    #[test]
    fn test_generate_points() {
        let data: Vec<RawSample> = [(11000, 80), (12000, 0), (13000, 85)]
            .iter()
            .map(|&(e, d)| RawSample {
                encoder_count: e,
                distance_cm: d,
                bytes_waiting: 9,
                delta_time_s: 0.01
            })
            .collect();

        let points = generate_points(&data, &ScanProcParams::default());
        assert_eq!(points.len(), 3);
        assert!(points[0].position().is_some());
        assert!(points[1].position().is_none());
        assert_eq!(points[2].encoder_count(), 13000);
    }
}
