//! Region segmentation
//!
//! A region is a maximal run of points where each point is close in range to
//! the one before it. Closeness is relative to the measured range, since
//! points on a distant wall are naturally further apart.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use serde::Serialize;

use super::{Point, ScanProcParams};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An inclusive range of point indexes `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub start: usize,
    pub end: usize
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Region {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of points in the region.
    pub fn num_points(&self) -> usize {
        self.end - self.start + 1
    }

    /// Index span of the region, used to rank regions by size.
    pub fn span(&self) -> usize {
        self.end - self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Split the points into continuous regions, in scan order.
///
/// A point starts a new region when the absolute range difference to the
/// previous point exceeds `gap` percent of its own range. Points before the
/// encoder window restart the current region, points after it end the
/// search. A run which would hold a single point is dropped.
pub fn generate_regions(points: &[Point], params: &ScanProcParams) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut start_index = 0;
    let mut last_index = None;

    for (n, pnt) in points.iter().enumerate() {
        if pnt.encoder_count() > params.hev {
            break;
        }
        last_index = Some(n);

        if pnt.encoder_count() < params.lev {
            start_index = n;
            continue;
        }

        let gap = match n {
            0 => 0.0,
            _ => (pnt.distance_cm() - points[n - 1].distance_cm()).abs()
        };

        if gap > params.gap * pnt.distance_cm() / 100.0 {
            if n > start_index + 1 {
                regions.push(Region::new(start_index, n - 1));
            }
            start_index = n;
        }
    }

    if let Some(n) = last_index {
        if n != start_index {
            regions.push(Region::new(start_index, n));
        }
    }

    trace!("Regions: {:?}", regions);

    regions
}

/// Indexes of the regions made of points with no return.
pub fn find_zero_regions(points: &[Point], regions: &[Region]) -> Vec<usize> {
    regions
        .iter()
        .enumerate()
        .filter(|(_, r)| !points[r.start].has_return())
        .map(|(n, _)| n)
        .collect()
}
