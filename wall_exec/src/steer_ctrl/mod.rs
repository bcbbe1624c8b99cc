//! # Steering control module
//!
//! Heading hold for straight drives. Each cycle the controller compares the
//! measured heading with the target and nudges a running spin trim. The trim
//! is an accumulator: a steady correction is held once the heading error
//! settles, so the controller never returns to the base trim by itself while
//! an error persists.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod controller;
mod params;
mod window;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use controller::*;
pub use params::*;
pub use window::*;
