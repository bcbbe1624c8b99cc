//! Archive records of processed scans
//!
//! The records are handed to the session saver, which writes them as JSON off
//! the control thread. Point fields use the short names every consumer of the
//! archived scans keys on.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::{ProcessScan, Region, ScanProcParams, Segment};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One archived point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointRecord {
    /// Encoder count
    pub enc_cnt: i32,

    /// Distance in centimeters, zero for no return
    pub dist: f64,

    /// Bytes waiting in the range-finder buffer when the sample was read
    pub bytes: usize,

    /// Time taken to read the sample in seconds
    pub delta_t: f64,

    /// Angle in radians, absent for no return
    pub theta: Option<f64>,

    /// Position in centimeters, absent for no return
    pub xy: Option<(f64, f64)>,
}

/// An archived scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanArchive {
    /// Sequence number of the scan in the run.
    pub nmbr: u32,

    pub params: ScanProcParams,

    pub points: Vec<PointRecord>,

    pub regions: Vec<Region>,

    pub zero_regions: Vec<usize>,

    pub segments: Vec<Segment>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScanArchive {
    pub fn new(nmbr: u32, scan: &ProcessScan) -> Self {
        let points = scan.points()
            .iter()
            .zip(scan.samples())
            .map(|(p, s)| PointRecord {
                enc_cnt: p.encoder_count(),
                dist: p.distance_cm(),
                bytes: s.bytes_waiting,
                delta_t: s.delta_time_s,
                theta: p.angle_rad(),
                xy: p.position().map(|xy| (xy.x, xy.y))
            })
            .collect();

        Self {
            nmbr,
            params: *scan.params(),
            points,
            regions: scan.regions().to_vec(),
            zero_regions: scan.zero_regions().to_vec(),
            segments: scan.segments().to_vec()
        }
    }

    /// Path of the archive relative to the session root.
    pub fn file_name(&self) -> String {
        format!("scans/scan_{}.json", self.nmbr)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::scan::RawSample;

    #[test]
    fn test_point_keys() {
        let samples = vec![
            RawSample { encoder_count: 20000, distance_cm: 100, bytes_waiting: 18, delta_time_s: 0.02 },
            RawSample { encoder_count: 20100, distance_cm: 0, bytes_waiting: 9, delta_time_s: 0.01 },
        ];
        let scan = ProcessScan::new(&samples, ScanProcParams::default()).unwrap();
        let archive = scan.to_archive(103);

        assert_eq!(archive.file_name(), "scans/scan_103.json");

        let json = serde_json::to_value(&archive).unwrap();
        let p0 = &json["points"][0];
        for key in &["enc_cnt", "dist", "bytes", "delta_t", "theta", "xy"] {
            assert!(p0.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(p0["bytes"], 18);
        assert!(json["points"][1]["xy"].is_null());
    }
}
