//! Planar geometry on points and lines
//!
//! Points are `nalgebra::Point2<f64>`. A line is held in general form
//! `a*x + b*y + c = 0`, which can represent vertical lines and is what the
//! point to line calculations want.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A line `a*x + b*y + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Line {

    /// Build the line passing through two points.
    ///
    /// If the points coincide all coefficients of the direction are zero and
    /// the line is degenerate, see [`Line::is_degenerate`].
    pub fn from_points(p1: &Point2<f64>, p2: &Point2<f64>) -> Self {
        Self {
            a: p2.y - p1.y,
            b: p1.x - p2.x,
            c: p2.x * p1.y - p1.x * p2.y
        }
    }

    /// True if the line was built from two coincident points.
    pub fn is_degenerate(&self) -> bool {
        self.a * self.a + self.b * self.b == 0.0
    }

    /// Foot of the perpendicular from `pt` onto the line.
    ///
    /// A degenerate line returns `pt` unchanged.
    pub fn project(&self, pt: &Point2<f64>) -> Point2<f64> {
        let (a, b, c) = (self.a, self.b, self.c);
        let denom = a * a + b * b;
        if denom == 0.0 {
            return *pt;
        }

        Point2::new(
            (b * b * pt.x - a * b * pt.y - a * c) / denom,
            (a * a * pt.y - a * b * pt.x - b * c) / denom
        )
    }

    /// Perpendicular distance between `pt` and the line.
    pub fn distance_to(&self, pt: &Point2<f64>) -> f64 {
        distance(pt, &self.project(pt))
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Euclidean distance between two points.
pub fn distance(p1: &Point2<f64>, p2: &Point2<f64>) -> f64 {
    (p1 - p2).norm()
}

/// Angle in degrees of the direction from `p0` to `p1`, measured from the
/// positive X axis, in `(-180, 180]`.
pub fn bearing_deg(p0: &Point2<f64>, p1: &Point2<f64>) -> f64 {
    (p1.y - p0.y).atan2(p1.x - p0.x).to_degrees()
}

/// Midpoint of two points.
pub fn midpoint(p1: &Point2<f64>, p2: &Point2<f64>) -> Point2<f64> {
    nalgebra::center(p1, p2)
}

/// Convert polar coordinates (range, angle in radians) to a point.
pub fn polar_to_rect(r: f64, theta_rad: f64) -> Point2<f64> {
    Point2::new(r * theta_rad.cos(), r * theta_rad.sin())
}

/// Convert a point to polar coordinates (range, angle in radians).
///
/// The angle is in `[0, 2pi)`.
pub fn rect_to_polar(pt: &Point2<f64>) -> (f64, f64) {
    let r = pt.coords.norm();
    let theta = crate::maths::rem_euclid(pt.y.atan2(pt.x), std::f64::consts::TAU);

    // rem_euclid may round up onto 2pi for tiny negative angles
    if theta >= std::f64::consts::TAU {
        (r, 0.0)
    }
    else {
        (r, theta)
    }
}
