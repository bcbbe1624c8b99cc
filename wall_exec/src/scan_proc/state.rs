//! Processed scan state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::scan::RawSample;
use log::debug;
use nalgebra::Point2;
use util::geom;

use super::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The result of processing one sweep: points, regions and segments.
///
/// Immutable once built. All indexes held by regions and segments are into
/// [`ProcessScan::points`].
#[derive(Debug, Clone)]
pub struct ProcessScan {
    params: ScanProcParams,

    samples: Vec<RawSample>,

    points: Vec<Point>,

    regions: Vec<Region>,

    /// Indexes into `regions` of the regions with no return.
    zero_regions: Vec<usize>,

    /// Segments of all regions in scan order.
    segments: Vec<Segment>,
}

/// Waypoint in the middle of the gap between the two longest walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapPlan {
    /// The far end of the left wall and the near end of the right wall.
    ///
    /// Units: centimeters
    pub gap_ends: (Point2<f64>, Point2<f64>),

    /// Units: centimeters
    pub waypoint: Point2<f64>,

    /// Bearing of the waypoint relative to straight ahead, positive to the
    /// left.
    ///
    /// Units: degrees
    pub course_deg: f64,

    /// Units: centimeters
    pub range_cm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProcessScan {
    /// Process the samples of one sweep.
    pub fn new(samples: &[RawSample], params: ScanProcParams) -> Result<Self, ScanProcError> {
        params.validate()?;

        let points = generate_points(samples, &params);
        let regions = generate_regions(&points, &params);
        let zero_regions = find_zero_regions(&points, &regions);

        let segments: Vec<Segment> = regions
            .iter()
            .flat_map(|r| region_segments(&points, r, &params))
            .collect();

        debug!(
            "Processed scan: {} points, {} regions ({} zero), {} segments",
            points.len(),
            regions.len(),
            zero_regions.len(),
            segments.len()
        );

        Ok(Self {
            params,
            samples: samples.to_vec(),
            points,
            regions,
            zero_regions,
            segments
        })
    }

    pub fn params(&self) -> &ScanProcParams {
        &self.params
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.samples
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn zero_regions(&self) -> &[usize] {
        &self.zero_regions
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_zero_region(&self, index: usize) -> bool {
        self.zero_regions.contains(&index)
    }

    /// Region indexes sorted by span, longest first.
    pub fn regions_by_length(&self) -> Vec<usize> {
        let mut indexes: Vec<usize> = (0..self.regions.len()).collect();
        indexes.sort_by(|a, b| self.regions[*b].span().cmp(&self.regions[*a].span()));
        indexes
    }

    /// Segments starting in the given region, longest first.
    pub fn segments_in_region(&self, index: usize) -> Result<Vec<Segment>, ScanProcError> {
        let region = self.regions
            .get(index)
            .ok_or(ScanProcError::NoSuchRegion(index))?;

        let mut segments: Vec<Segment> = self.segments
            .iter()
            .filter(|s| region.contains(s.start))
            .copied()
            .collect();
        segments.sort_by(|a, b| b.span().cmp(&a.span()));

        Ok(segments)
    }

    /// Index of the non-zero region holding the closest return, if any.
    pub fn closest_region(&self) -> Option<usize> {
        self.regions
            .iter()
            .enumerate()
            .filter(|(n, _)| !self.is_zero_region(*n))
            .filter_map(|(n, r)| {
                self.points[r.start..=r.end]
                    .iter()
                    .filter(|p| p.has_return())
                    .map(|p| p.distance_cm())
                    .fold(None, |min: Option<f64>, d| Some(min.map_or(d, |m| m.min(d))))
                    .map(|d| (n, d))
            })
            .fold(None, |best: Option<(usize, f64)>, (n, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((n, d))
            })
            .map(|(n, _)| n)
    }

    /// Line parameters of every segment whose end points have positions, in
    /// scan order.
    pub fn line_parameters(&self) -> Vec<LineParams> {
        self.segments
            .iter()
            .filter_map(|s| LineParams::from_segment(&self.points, s))
            .collect()
    }

    /// Line parameters of the longest segment of the closest region.
    pub fn closest_line(&self) -> Option<LineParams> {
        let region = self.closest_region()?;
        let segments = self.segments_in_region(region).ok()?;
        segments
            .first()
            .and_then(|s| LineParams::from_segment(&self.points, s))
    }

    /// Plan a waypoint through the gap between the two longest walls.
    ///
    /// Zero regions are ignored. Of the two longest remaining regions, taken
    /// in scan order, the gap lies between the last point of the first
    /// (leftmost) and the first point of the second.
    pub fn find_gap_waypoint(&self) -> Option<GapPlan> {
        let mut longest: Vec<usize> = self.regions_by_length()
            .into_iter()
            .filter(|n| !self.is_zero_region(*n))
            .take(2)
            .collect();

        if longest.len() < 2 {
            return None;
        }
        longest.sort_unstable();

        let left = self.points[self.regions[longest[0]].end].position()?;
        let right = self.points[self.regions[longest[1]].start].position()?;

        let waypoint = geom::midpoint(&left, &right);
        let (range_cm, theta_rad) = geom::rect_to_polar(&waypoint);

        Some(GapPlan {
            gap_ends: (left, right),
            waypoint,
            course_deg: theta_rad.to_degrees() - 90.0,
            range_cm
        })
    }

    /// Pick a target in an open sector of this scan.
    pub fn open_sector_target(&self) -> Option<OpenSectorTarget> {
        sectors::auto_detect_open_sector(&self.points, &self.params)
    }

    /// Build the archive record of this scan.
    pub fn to_archive(&self, nmbr: u32) -> ScanArchive {
        ScanArchive::new(nmbr, self)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// Samples of a sweep over a set of walls, as the range-finder would
    /// return them. `range` gives the distance for an angle in degrees.
    pub(crate) fn sweep_samples<F>(num: usize, range: F) -> Vec<RawSample>
    where
        F: Fn(f64) -> f64
    {
        let params = ScanProcParams::default();
        (0..num)
            .map(|i| {
                let enc = params.lev + ((params.hev - params.lev) as usize * i / (num - 1)) as i32;
                let theta = encoder_to_rad(enc, &params).to_degrees();
                RawSample {
                    encoder_count: enc,
                    distance_cm: range(theta).round() as i32,
                    bytes_waiting: 9,
                    delta_time_s: 0.01
                }
            })
            .collect()
    }

    /// Two wall pieces with a doorway straight ahead and nothing beyond it.
    fn doorway() -> Vec<RawSample> {
        sweep_samples(81, |theta| {
            if (80.0..=100.0).contains(&theta) {
                0.0
            }
            else {
                (100.0 / theta.to_radians().sin().abs()).min(300.0)
            }
        })
    }

    #[test]
    fn test_invalid_params() {
        let params = ScanProcParams { gap: -1.0, ..Default::default() };
        assert!(ProcessScan::new(&doorway(), params).is_err());
    }

    #[test]
    fn test_doorway() {
        let scan = ProcessScan::new(&doorway(), ScanProcParams::default()).unwrap();

        assert_eq!(scan.points().len(), 81);

        // Regions are disjoint and ordered
        for w in scan.regions().windows(2) {
            assert!(w[0].end < w[1].start);
        }

        // The doorway is a zero region
        assert_eq!(scan.zero_regions().len(), 1);
        let zr = scan.regions()[scan.zero_regions()[0]];
        assert!(!scan.points()[zr.start].has_return());

        // Segments tile each region
        for (n, r) in scan.regions().iter().enumerate() {
            let mut segs = scan.segments_in_region(n).unwrap();
            segs.sort_by_key(|s| s.start);
            assert_eq!(segs.first().unwrap().start, r.start);
            assert_eq!(segs.last().unwrap().end, r.end);
            for w in segs.windows(2) {
                assert_eq!(w[0].end, w[1].start);
            }
        }

        let plan = scan.find_gap_waypoint().unwrap();
        assert!(plan.course_deg.abs() < 3.0);
        assert!(plan.waypoint.y > 90.0 && plan.waypoint.y < 110.0);
        assert!((plan.range_cm - plan.waypoint.coords.norm()).abs() < 1e-9);
    }

    #[test]
    fn test_regions_by_length() {
        // A long far wall on the left, a short near post on the right
        let samples = sweep_samples(41, |theta| if theta < 30.0 { 50.0 } else { 200.0 });
        let scan = ProcessScan::new(&samples, ScanProcParams::default()).unwrap();

        assert_eq!(scan.regions().len(), 2);
        assert_eq!(scan.regions_by_length(), vec![0, 1]);
        assert_eq!(scan.closest_region(), Some(1));
        assert!(scan.segments_in_region(2).is_err());
    }

    #[test]
    fn test_no_usable_gap() {
        let samples = sweep_samples(41, |_| 0.0);
        let scan = ProcessScan::new(&samples, ScanProcParams::default()).unwrap();

        assert_eq!(scan.closest_region(), None);
        assert!(scan.find_gap_waypoint().is_none());
        assert!(scan.closest_line().is_none());
    }

    #[test]
    fn test_closest_line_of_side_wall() {
        // A single straight wall 60cm to the left, parallel to travel
        let samples = sweep_samples(81, |theta| {
            if theta > 95.0 {
                60.0 / (180.0 - theta).to_radians().cos()
            }
            else {
                0.0
            }
        });
        let scan = ProcessScan::new(&samples, ScanProcParams::default()).unwrap();

        let line = scan.closest_line().unwrap();
        assert!((line.origin_distance - 60.0).abs() < 2.0);
        // Scan order runs along the wall from beside the vehicle forwards
        assert!((line.angle_deg.abs() - 90.0).abs() < 3.0);
    }

    #[test]
    fn test_line_parameters_of_corner() {
        // Wall 60cm to the left meeting a wall 100cm ahead, nothing beyond
        // 300cm on the right
        let samples = sweep_samples(81, |theta| {
            let t = theta.to_radians();
            let front = 100.0 / t.sin();
            let d = if theta > 90.0 { front.min(60.0 / -t.cos()) } else { front };
            if d > 300.0 { 0.0 } else { d }
        });
        let scan = ProcessScan::new(&samples, ScanProcParams::default()).unwrap();

        let lines = scan.line_parameters();
        let with_positions = scan.segments()
            .iter()
            .filter(|s| scan.points()[s.start].has_return() && scan.points()[s.end].has_return())
            .count();
        assert_eq!(lines.len(), with_positions);
        assert!(lines.len() >= 2);
        assert!(lines.iter().all(|l| l.length > 0.0));

        // Scan order starts with the left wall
        assert!((lines[0].origin_distance - 60.0).abs() < 5.0);
        assert!(lines.iter().any(|l| (l.origin_distance - 100.0).abs() < 5.0));
    }
}
