//! # Lidar Frame Decoding
//!
//! The range-finder streams fixed length frames over a serial line:
//!
//! | Byte | Content                                  |
//! |------|------------------------------------------|
//! | 0, 1 | Header, `0x59 0x59`                      |
//! | 2, 3 | Distance, little endian, centimeters     |
//! | 4, 5 | Signal strength, little endian           |
//! | 6, 7 | Temperature, little endian, `t/8 - 256`  |
//! | 8    | Checksum, low byte of the sum of 0 to 7  |
//!
//! If the stream is joined part way through a frame, or a byte is dropped, the decoder discards
//! bytes until it finds two consecutive header markers again.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use byteorder::{ByteOrder, LittleEndian};
use log::warn;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Frame header marker, two of which start every frame.
pub const FRAME_MARKER: u8 = 0x59;

/// Length of one frame in bytes.
pub const FRAME_LEN: usize = 9;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One decoded range measurement.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LidarFrame {
    /// Measured distance, 0 when there was no return.
    ///
    /// Units: centimeters
    pub distance_cm: u16,

    /// Signal strength of the return.
    pub strength: u16,

    /// Temperature of the module.
    ///
    /// Units: degrees celsius
    pub temperature_c: f64,
}

/// Incremental decoder turning a serial byte stream into frames.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,

    /// True while bytes are being discarded to find a header
    resyncing: bool,

    /// Number of times the stream had to be resynchronised
    resync_count: u64,

    /// Number of frames dropped because of a bad checksum
    bad_checksum_count: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LidarFrame {
    /// Parse a frame whose header and checksum have already been checked.
    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            distance_cm: LittleEndian::read_u16(&bytes[2..4]),
            strength: LittleEndian::read_u16(&bytes[4..6]),
            temperature_c: LittleEndian::read_u16(&bytes[6..8]) as f64 / 8.0 - 256.0,
        }
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times synchronisation was lost and regained.
    pub fn resync_count(&self) -> u64 {
        self.resync_count
    }

    /// Number of frames dropped because of a bad checksum.
    pub fn bad_checksum_count(&self) -> u64 {
        self.bad_checksum_count
    }

    /// Push newly received bytes and return every complete frame they finish, oldest first.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<LidarFrame> {
        self.buf.extend_from_slice(bytes);

        let mut frames = Vec::new();
        let mut start = 0;

        while self.buf.len() - start >= 2 {
            let window = &self.buf[start..];

            if window[0] != FRAME_MARKER || window[1] != FRAME_MARKER {
                if !self.resyncing {
                    warn!("Lidar frame header mismatch, resynchronising");
                    self.resyncing = true;
                }
                start += 1;
                continue;
            }

            if window.len() < FRAME_LEN {
                break;
            }

            if self.resyncing {
                self.resyncing = false;
                self.resync_count += 1;
            }

            let frame = &window[..FRAME_LEN];
            let checksum = frame[..FRAME_LEN - 1]
                .iter()
                .fold(0u8, |acc, b| acc.wrapping_add(*b));

            if checksum == frame[FRAME_LEN - 1] {
                frames.push(LidarFrame::from_bytes(frame));
                start += FRAME_LEN;
            }
            else {
                // The markers may have been payload bytes, so only step past one of them
                warn!(
                    "Lidar frame checksum mismatch (expected {:#04x}, found {:#04x})",
                    checksum,
                    frame[FRAME_LEN - 1]
                );
                self.bad_checksum_count += 1;
                start += 1;
            }
        }

        self.buf.drain(..start);

        frames
    }
}
