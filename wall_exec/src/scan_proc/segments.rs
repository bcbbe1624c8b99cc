//! Line fitting and corner finding
//!
//! Within a region, straight lines are grown greedily: starting at one point,
//! the far end of the line is moved one point at a time while the points it
//! passes over stay close to the line. The point where the fit breaks is a
//! corner, and the search restarts from it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use nalgebra::Point2;
use serde::Serialize;
use util::geom::{self, Line};

use super::{CornerStrategy, Point, Region, ScanProcParams};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A range of point indexes `[start, end]` which are well fit by the straight
/// line between the two end points.
///
/// Adjacent segments of a region share their boundary index, the corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize
}

/// Parameters of the line joining the end points of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineParams {
    /// Segment end points in the vehicle frame.
    ///
    /// Units: centimeters
    pub endpoints: (Point2<f64>, Point2<f64>),

    /// Units: centimeters
    pub length: f64,

    /// Direction from the first to the second end point, from the vehicle's
    /// X axis.
    ///
    /// Units: degrees, `(-180, 180]`
    pub angle_deg: f64,

    /// Perpendicular distance from the vehicle to the line.
    ///
    /// Units: centimeters
    pub origin_distance: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Index span of the segment.
    pub fn span(&self) -> usize {
        self.end - self.start
    }

    /// Mean distance of the interior points to the line through the end
    /// points, or `None` if any point of the segment has no position.
    pub fn mean_residual(&self, points: &[Point]) -> Option<f64> {
        let positions = positions_of(&points[self.start..=self.end])?;
        Some(mean_distance_to_line(&positions, 0, positions.len() - 1))
    }
}

impl LineParams {
    /// Compute the line parameters of a segment, `None` if an end point has
    /// no position.
    pub fn from_segment(points: &[Point], segment: &Segment) -> Option<Self> {
        let p1 = points.get(segment.start)?.position()?;
        let p2 = points.get(segment.end)?.position()?;

        let line = Line::from_points(&p1, &p2);

        Some(Self {
            endpoints: (p1, p2),
            length: geom::distance(&p1, &p2),
            angle_deg: geom::bearing_deg(&p1, &p2),
            origin_distance: line.distance_to(&Point2::origin())
        })
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Mean perpendicular distance of the points strictly between `begin` and
/// `end` to the line through those two points.
///
/// `begin` and `end` may be given in either order. With no points in between
/// the mean is zero. Coincident end points give a degenerate line, against
/// which every point is at distance zero.
pub fn mean_distance_to_line(positions: &[Point2<f64>], begin: usize, end: usize) -> f64 {
    let (lo, hi) = if begin <= end { (begin, end) } else { (end, begin) };

    if hi - lo < 2 {
        return 0.0;
    }

    let line = Line::from_points(&positions[begin], &positions[end]);

    let sum: f64 = positions[lo + 1..hi]
        .iter()
        .map(|p| line.distance_to(p))
        .sum();

    sum / (hi - lo - 1) as f64
}

/// Grow a line from `begin` towards `end` and return the index of the last
/// point for which the line still fits.
///
/// The candidate end point moves one index at a time. The fit holds while the
/// mean distance of the points passed over is below `fit`. The neighbour of
/// `begin` always fits, so the result moves at least one index towards `end`
/// unless `begin == end`.
pub fn find_line_segment(
    positions: &[Point2<f64>],
    begin: usize,
    end: usize,
    fit: f64
) -> usize {
    if begin == end {
        return begin;
    }

    let step = |i: usize| if begin < end { i + 1 } else { i - 1 };
    let mut last_fit = step(begin);

    while last_fit != end {
        let candidate = step(last_fit);

        if mean_distance_to_line(positions, begin, candidate) < fit {
            last_fit = candidate;
        }
        else {
            break;
        }
    }

    last_fit
}

/// Find corners by growing lines from the first position towards the last.
///
/// The returned indexes ascend and the last one is always the final index.
pub fn find_corners(positions: &[Point2<f64>], fit: f64) -> Vec<usize> {
    let mut corners = Vec::new();

    if positions.is_empty() {
        return corners;
    }

    let last = positions.len() - 1;
    let mut start = 0;
    while start != last {
        start = find_line_segment(positions, start, last, fit);
        corners.push(start);
    }

    corners
}

/// Find corners by growing lines from the last position towards the first.
///
/// The returned indexes descend and the last one is always zero. The corners
/// found may differ from those of [`find_corners`] on the same positions.
pub fn find_corners_reverse(positions: &[Point2<f64>], fit: f64) -> Vec<usize> {
    let mut corners = Vec::new();

    if positions.is_empty() {
        return corners;
    }

    let mut start = positions.len() - 1;
    while start != 0 {
        start = find_line_segment(positions, start, 0, fit);
        corners.push(start);
    }

    corners
}

/// Split a region into segments at its corners.
///
/// The segments tile the region in index order. Regions of one or two points,
/// and regions containing points with no return, are a single segment.
pub fn region_segments(
    points: &[Point],
    region: &Region,
    params: &ScanProcParams
) -> Vec<Segment> {
    let trivial = vec![Segment::new(region.start, region.end)];

    if region.num_points() <= 2 {
        return trivial;
    }

    let positions = match positions_of(&points[region.start..=region.end]) {
        Some(p) => p,
        None => return trivial
    };

    let local_corners = match params.corner_strategy {
        CornerStrategy::Forward => find_corners(&positions, params.fit),
        CornerStrategy::Reverse => find_corners_reverse(&positions, params.fit)
    };

    debug!(
        "Region {:?} corners ({:?}): {:?}",
        region, params.corner_strategy, local_corners
    );

    let mut indexes: Vec<usize> = local_corners
        .iter()
        .map(|c| region.start + c)
        .collect();
    indexes.push(region.start);
    indexes.push(region.end);
    indexes.sort_unstable();
    indexes.dedup();

    indexes
        .windows(2)
        .map(|w| Segment::new(w[0], w[1]))
        .collect()
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Positions of all points, `None` if any point has no return.
fn positions_of(points: &[Point]) -> Option<Vec<Point2<f64>>> {
    points.iter().map(|p| p.position()).collect()
}
