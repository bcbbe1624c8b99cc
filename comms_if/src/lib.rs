//! # Communications interface crate.
//!
//! Provides the contracts between the vehicle software and its equipment: the
//! wheels and compass behind [`eqpt::motion::MotionInterface`], and the
//! rotating range-finder behind [`eqpt::scan::ScanInterface`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command and response definitions for equipment (wheels, compass, lidar)
pub mod eqpt;
