//! # Scan Equipment Interface
//!
//! A scan is one sweep of the range-finder rotor. The rotor's angular encoder reads 0 at back dead
//! centre (BDC, straight behind the vehicle) and increases with clockwise rotation, topping out at
//! [`ENCODER_MAX`] shortly before coming back round to BDC.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Instant;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::{
    lidar::{FrameDecoder, LidarFrame, FRAME_LEN},
    EqptError,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Saturated value of the rotor encoder.
pub const ENCODER_MAX: i32 = 32767;

/// Encoder values at or below this are considered to be close enough to BDC to start a sweep.
pub const BDC_THRESHOLD: i32 = 3000;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One range sample taken during a sweep.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Rotor encoder value at the time of the sample.
    pub encoder_count: i32,

    /// Most recent distance measured by the range-finder, 0 for no return.
    ///
    /// Units: centimeters
    pub distance_cm: i32,

    /// Number of bytes that were waiting on the serial line when sampled.
    pub bytes_waiting: usize,

    /// Time since the previous sample.
    ///
    /// Units: seconds
    pub delta_time_s: f64,
}

/// Polling limits of the sweep busy-waits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct SweepParams {
    /// Maximum number of encoder polls in any one phase of a sweep.
    pub max_encoder_polls: u64,
}

/// A [`ScanInterface`] built from a rotor and a serial range-finder.
pub struct RotorScanner<R: ScanRotor> {
    rotor: R,
    params: SweepParams,
    decoder: FrameDecoder,

    /// The last distance decoded from the range-finder
    distance_cm: i32,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Source of scans.
pub trait ScanInterface {
    /// Perform one full sweep of the rotor starting from BDC at `speed`, returning only the
    /// samples whose encoder value lies strictly between `lev` and `hev`, in sweep order.
    fn scan(&mut self, speed: i32, lev: i32, hev: i32) -> Result<Vec<RawSample>, EqptError>;
}

/// Low level access to the scanning rotor and the serial line of its range-finder.
pub trait ScanRotor {
    /// Start the rotor motor at `speed`.
    fn start_motor(&mut self, speed: i32) -> Result<(), EqptError>;

    /// Stop the rotor motor.
    fn stop_motor(&mut self) -> Result<(), EqptError>;

    /// Read the rotor's angular encoder.
    fn encoder(&mut self) -> Result<i32, EqptError>;

    /// Number of bytes waiting on the serial line.
    fn bytes_waiting(&mut self) -> Result<usize, EqptError>;

    /// Read up to `buf.len()` waiting bytes, returning the number read.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, EqptError>;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            max_encoder_polls: 1_000_000,
        }
    }
}

impl<R: ScanRotor> RotorScanner<R> {
    pub fn new(rotor: R, params: SweepParams) -> Self {
        Self {
            rotor,
            params,
            decoder: FrameDecoder::new(),
            distance_cm: 0,
        }
    }

    /// Consume the scanner, returning the rotor.
    pub fn into_inner(self) -> R {
        self.rotor
    }

    /// Read everything waiting on the serial line and keep the newest distance.
    ///
    /// Returns the number of bytes that were waiting and the newest frame, if any.
    pub fn read_distance(&mut self) -> Result<(usize, Option<LidarFrame>), EqptError> {
        let waiting = self.rotor.bytes_waiting()?;
        if waiting < FRAME_LEN {
            return Ok((waiting, None));
        }

        let mut buf = vec![0u8; waiting];
        let n = self.rotor.read_bytes(&mut buf)?;
        let newest = self.decoder.push(&buf[..n]).pop();

        if let Some(f) = newest {
            self.distance_cm = f.distance_cm as i32;
        }

        Ok((waiting, newest))
    }

    /// Poll the encoder while `cond` holds, failing if it holds for too long.
    fn poll_encoder_while<F>(&mut self, mut enc: i32, what: &'static str, cond: F)
        -> Result<i32, EqptError>
    where
        F: Fn(i32) -> bool,
    {
        let mut polls = 0;
        while cond(enc) {
            if polls >= self.params.max_encoder_polls {
                return Err(EqptError::Timeout {
                    what,
                    polls,
                });
            }
            enc = self.rotor.encoder()?;
            polls += 1;
        }

        Ok(enc)
    }

    fn sweep(&mut self, speed: i32, lev: i32, hev: i32) -> Result<Vec<RawSample>, EqptError> {
        let mut enc = self.rotor.encoder()?;
        self.rotor.start_motor(speed)?;

        // If the rotor isn't near BDC run it round to BDC first
        if enc > BDC_THRESHOLD {
            trace!("Rotor at {}, running to BDC", enc);
            enc = self.poll_encoder_while(enc, "rotor to reach encoder max", |e| e < ENCODER_MAX)?;
            enc = self.poll_encoder_while(enc, "rotor to pass BDC", |e| e == ENCODER_MAX)?;
        }
        else {
            enc = self.rotor.encoder()?;
        }

        let mut last_time = Instant::now();
        let mut data = Vec::new();
        let mut polls = 0u64;

        while enc < ENCODER_MAX {
            if polls >= self.params.max_encoder_polls {
                return Err(EqptError::Timeout {
                    what: "sweep to complete",
                    polls,
                });
            }
            polls += 1;

            enc = self.rotor.encoder()?;
            if lev < enc && enc < hev {
                let (bytes_waiting, _) = self.read_distance()?;
                let now = Instant::now();
                data.push(RawSample {
                    encoder_count: enc,
                    distance_cm: self.distance_cm,
                    bytes_waiting,
                    delta_time_s: (now - last_time).as_secs_f64(),
                });
                last_time = now;
            }
        }

        debug!("Sweep complete with {} samples in ({}, {})", data.len(), lev, hev);

        Ok(data)
    }
}

impl<R: ScanRotor> ScanInterface for RotorScanner<R> {
    fn scan(&mut self, speed: i32, lev: i32, hev: i32) -> Result<Vec<RawSample>, EqptError> {
        let result = self.sweep(speed, lev, hev);

        // The motor must stop even if the sweep failed
        self.rotor.stop_motor()?;

        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::lidar::test::frame_bytes;
    use std::collections::VecDeque;

    /// Rotor replaying a fixed list of encoder values, with a frame available at every read.
    struct ReplayRotor {
        encoder: VecDeque<i32>,
        serial: Vec<u8>,
        next_distance: u16,
        running: bool,
    }

    impl ScanRotor for ReplayRotor {
        fn start_motor(&mut self, _speed: i32) -> Result<(), EqptError> {
            self.running = true;
            Ok(())
        }

        fn stop_motor(&mut self) -> Result<(), EqptError> {
            self.running = false;
            Ok(())
        }

        fn encoder(&mut self) -> Result<i32, EqptError> {
            self.encoder
                .pop_front()
                .ok_or_else(|| EqptError::NotAvailable("encoder exhausted".into()))
        }

        fn bytes_waiting(&mut self) -> Result<usize, EqptError> {
            if self.serial.is_empty() {
                self.serial.extend_from_slice(&frame_bytes(self.next_distance));
                self.next_distance += 1;
            }
            Ok(self.serial.len())
        }

        fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, EqptError> {
            let n = buf.len().min(self.serial.len());
            buf[..n].copy_from_slice(&self.serial[..n]);
            self.serial.drain(..n);
            Ok(n)
        }
    }

    #[test]
    fn test_sweep_from_bdc() {
        let rotor = ReplayRotor {
            encoder: vec![100, 200, 12000, 20000, 28000, 31000, ENCODER_MAX]
                .into_iter()
                .collect(),
            serial: Vec::new(),
            next_distance: 50,
            running: false,
        };

        let mut scanner = RotorScanner::new(rotor, SweepParams::default());
        let data = scanner.scan(200, 10000, 30000).unwrap();

        let encs: Vec<i32> = data.iter().map(|s| s.encoder_count).collect();
        assert_eq!(encs, vec![12000, 20000, 28000]);
        assert_eq!(data[0].distance_cm, 50);
        assert_eq!(data[2].distance_cm, 52);
        assert!(data.iter().all(|s| s.bytes_waiting == FRAME_LEN));
        assert!(!scanner.into_inner().running);
    }

    #[test]
    fn test_sweep_runs_to_bdc_first() {
        let rotor = ReplayRotor {
            encoder: vec![15000, 20000, ENCODER_MAX, ENCODER_MAX, 50, 20000, ENCODER_MAX]
                .into_iter()
                .collect(),
            serial: Vec::new(),
            next_distance: 10,
            running: false,
        };

        let mut scanner = RotorScanner::new(rotor, SweepParams::default());
        let data = scanner.scan(200, 10000, 30000).unwrap();

        // Only the 20000 after BDC belongs to the sweep
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].encoder_count, 20000);
    }

    #[test]
    fn test_sweep_stalled_rotor_times_out() {
        let rotor = ReplayRotor {
            encoder: std::iter::repeat(20000).take(50).collect(),
            serial: Vec::new(),
            next_distance: 10,
            running: false,
        };

        let params = SweepParams {
            max_encoder_polls: 10,
        };
        let mut scanner = RotorScanner::new(rotor, params);

        assert!(matches!(
            scanner.scan(200, 10000, 30000),
            Err(EqptError::Timeout { .. })
        ));
        assert!(!scanner.into_inner().running);
    }
}
