//! # Scan processing module
//!
//! Turns the raw samples of one rotor sweep into a geometric description of
//! the walls around the vehicle:
//!
//! 1. Each sample becomes a [`Point`], with an angle and a position in the
//!    vehicle frame when the range-finder saw a return.
//! 2. Points are split into [`Region`]s of spatially continuous points. A
//!    region with no returns is a "zero region", an open direction.
//! 3. Each region is split at its corners into straight [`Segment`]s.
//!
//! The vehicle frame has X to the right and Y ahead, angles are counter
//! clockwise from X. Encoder counts `[enc_left, enc_right]` map onto angles
//! `[pi, 0]`, so points in scan order sweep from left to right. Only samples
//! in the window `[lev, hev]` are split into regions.
//!
//! Open sector detection, looking for gaps to drive through, works on the
//! same points and lives in [`sectors`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod archive;
mod params;
mod point;
mod regions;
pub mod sectors;
mod segments;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use archive::*;
pub use params::*;
pub use point::*;
pub use regions::*;
pub use sectors::{Sector, OpenSectorTarget};
pub use segments::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during scan processing.
#[derive(Debug, thiserror::Error)]
pub enum ScanProcError {
    #[error("Invalid encoder window: low value {lev} must be less than high value {hev}")]
    InvalidWindow {
        lev: i32,
        hev: i32
    },

    #[error("The {name} threshold must be positive, found {value}")]
    InvalidThreshold {
        name: &'static str,
        value: f64
    },

    #[error("Region index {0} is out of range")]
    NoSuchRegion(usize),
}
