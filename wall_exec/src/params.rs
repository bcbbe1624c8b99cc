//! # Wall Executable Parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::sim::SimParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the wall executable.
///
/// Module parameter files are given relative to the parameters directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallExecParams {
    pub scan_proc_params: String,

    pub steer_ctrl_params: String,

    pub nav_ctrl_params: String,

    /// Write the steering controller's per-cycle reports into the session
    /// archive.
    pub archive_steering: bool,

    /// The simulated vehicle driven when no hardware is linked.
    pub sim: SimParams,
}

impl Default for WallExecParams {
    fn default() -> Self {
        Self {
            scan_proc_params: "scan_proc.toml".into(),
            steer_ctrl_params: "steer_ctrl.toml".into(),
            nav_ctrl_params: "nav_ctrl.toml".into(),
            archive_steering: true,
            sim: SimParams::default()
        }
    }
}
