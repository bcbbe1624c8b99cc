//! # Equipment Interface
//!
//! This module defines the interfaces the vehicle software uses to drive and
//! read its equipment. The hardware layer implements the traits, the control
//! software only ever sees the traits.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod lidar;
pub mod motion;
pub mod scan;

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

/// Errors raised by equipment implementations.
#[derive(Debug, thiserror::Error)]
pub enum EqptError {
    #[error("Equipment is not available: {0}")]
    NotAvailable(String),

    #[error("I/O error while communicating with equipment: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out after {polls} polls waiting for {what}")]
    Timeout {
        what: &'static str,
        polls: u64
    },
}
