//! Open sector detection
//!
//! An open sector is an angular span of the scan in which nothing was seen
//! within some radius of the vehicle, a candidate direction to drive in.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, warn};
use nalgebra::Point2;
use serde::Serialize;
use util::geom::polar_to_rect;

use super::{encoder_to_rad, Point, ScanProcParams};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Factor applied to the mean measured distance to get the detection radius.
pub const RADIUS_FACTOR: f64 = 1.5;

/// Sectors must be strictly wider than this to be driven through.
///
/// Units: degrees
pub const MIN_SECTOR_WIDTH_DEG: f64 = 12.0;

/// Fraction of the detection radius at which the target is placed.
pub const TARGET_RANGE_FACTOR: f64 = 0.7;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Angular span in scan order. As scan order runs left to right the start
/// angle is normally the larger one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sector {
    /// Units: degrees
    pub start_deg: f64,

    /// Units: degrees
    pub end_deg: f64,
}

/// A drive target inside an open sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpenSectorTarget {
    pub sector: Sector,

    /// Radius at which the sector was detected.
    ///
    /// Units: centimeters
    pub radius_cm: f64,

    /// Target position in the vehicle frame.
    ///
    /// Units: centimeters
    pub target: Point2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Sector {
    /// Units: degrees
    pub fn width_deg(&self) -> f64 {
        (self.end_deg - self.start_deg).abs()
    }

    /// Units: degrees
    pub fn mid_deg(&self) -> f64 {
        0.5 * (self.start_deg + self.end_deg)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the sectors, in scan order, in which no point lies within `radius_cm`.
///
/// A point is open if it has no return or its return is beyond the radius.
/// Angles come from the encoder count so points with no return still have
/// one.
pub fn open_sectors(points: &[Point], radius_cm: f64, params: &ScanProcParams) -> Vec<Sector> {
    let mut sectors = Vec::new();
    let mut current: Option<Sector> = None;

    for pnt in points {
        let angle_deg = encoder_to_rad(pnt.encoder_count(), params).to_degrees();
        let open = pnt.distance_cm() <= 0.0 || pnt.distance_cm() > radius_cm;

        if open {
            let start_deg = current.map_or(angle_deg, |s| s.start_deg);
            current = Some(Sector {
                start_deg,
                end_deg: angle_deg
            });
        }
        else if let Some(s) = current.take() {
            sectors.push(s);
        }
    }

    if let Some(s) = current {
        if sectors.last() != Some(&s) {
            sectors.push(s);
        }
    }

    sectors
}

/// Pick a target in the first sufficiently wide open sector.
///
/// The detection radius is a multiple of the mean of the measured distances,
/// so a scan with no returns at all gives no target.
pub fn auto_detect_open_sector(
    points: &[Point],
    params: &ScanProcParams
) -> Option<OpenSectorTarget> {
    let dists: Vec<f64> = points
        .iter()
        .filter(|p| p.has_return())
        .map(|p| p.distance_cm())
        .collect();

    let radius_cm = match util::maths::mean(&dists) {
        Some(m) => RADIUS_FACTOR * m,
        None => {
            warn!("No returns in scan, cannot size open sector radius");
            return None;
        }
    };

    let sectors = open_sectors(points, radius_cm, params);
    debug!("Open sectors at {:.1} cm: {:?}", radius_cm, sectors);

    let sector = sectors
        .into_iter()
        .find(|s| s.width_deg() > MIN_SECTOR_WIDTH_DEG)?;

    Some(OpenSectorTarget {
        sector,
        radius_cm,
        target: polar_to_rect(
            TARGET_RANGE_FACTOR * radius_cm,
            sector.mid_deg().to_radians()
        )
    })
}

#[cfg(test)]
mod test {
    use super::*;

    /// 60 samples evenly spread over the encoder window.
    fn sweep(dist: impl Fn(usize) -> f64) -> Vec<Point> {
        let params = ScanProcParams::default();
        (0..60)
            .map(|i| Point::new(10000 + 20000 * i as i32 / 59, dist(i), &params))
            .collect()
    }

    #[test]
    fn test_all_open() {
        let points = sweep(|_| 500.0);
        let sectors = open_sectors(&points, 100.0, &ScanProcParams::default());

        assert_eq!(sectors.len(), 1);
        assert!((sectors[0].start_deg - 180.0).abs() < 1e-9);
        assert!(sectors[0].end_deg.abs() < 1e-9);
    }

    #[test]
    fn test_obstruction_splits_sweep() {
        let points = sweep(|i| if (20..40).contains(&i) { 50.0 } else { 0.0 });
        let params = ScanProcParams::default();
        let sectors = open_sectors(&points, 100.0, &params);

        assert_eq!(sectors.len(), 2);

        let angle = |i: usize| encoder_to_rad(points[i].encoder_count(), &params).to_degrees();
        assert_eq!(sectors[0], Sector { start_deg: angle(0), end_deg: angle(19) });
        assert_eq!(sectors[1], Sector { start_deg: angle(40), end_deg: angle(59) });
    }

    #[test]
    fn test_all_closed() {
        let points = sweep(|_| 50.0);
        assert!(open_sectors(&points, 100.0, &ScanProcParams::default()).is_empty());
    }

    #[test]
    fn test_auto_detect() {
        // A near wall over the left two thirds, far on the right
        let points = sweep(|i| if i < 40 { 100.0 } else { 400.0 });
        let target = auto_detect_open_sector(&points, &ScanProcParams::default()).unwrap();

        // Mean 200, radius 300
        assert!((target.radius_cm - 300.0).abs() < 1e-9);
        assert!(target.sector.width_deg() > MIN_SECTOR_WIDTH_DEG);
        assert!(target.target.x > 0.0);
        assert!((target.target.coords.norm() - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_auto_detect_no_returns() {
        let points = sweep(|_| 0.0);
        assert!(auto_detect_open_sector(&points, &ScanProcParams::default()).is_none());
    }
}
