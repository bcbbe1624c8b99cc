//! Host platform (linux for example) utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the software root.
pub const SW_ROOT_ENV_VAR: &str = "WALLCAR_SW_ROOT";

/// Get the root directory of the software installation.
///
/// The root contains the `params` directory and is where new sessions are
/// created.
pub fn get_wallcar_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
