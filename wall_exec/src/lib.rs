//! # Wall following library
//!
//! Perception and control of a vehicle which follows walls using a rotating
//! range-finder. Scans are turned into walls by [`scan_proc`], headings are
//! held by [`steer_ctrl`] and the maneuvers are sequenced by [`nav_ctrl`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod eta;
pub mod nav_ctrl;
pub mod params;
pub mod scan_proc;
pub mod sim;
pub mod steer_ctrl;
