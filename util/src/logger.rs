//! Logger setup for the executables
//!
//! All crates log through the `log` facade. The executable installs a `fern`
//! dispatch which writes to stdout and to the session log file, stamping each
//! line with the number of seconds since the session epoch.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use fern;
use colored::{ColoredString, Colorize};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Log targets which emit a line on every control cycle. These get their own
/// level so that a debug run isn't drowned by controller output.
const CYCLE_TARGETS: [&str; 2] = [
    "wall_lib::steer_ctrl",
    "wall_lib::eta",
];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
/// 
/// `min_level` applies to everything except the per-cycle control targets,
/// which use `cycle_level`. The effective cycle level is never more verbose
/// than `min_level`.
///
/// # Notes
/// 
/// - `min_level` must be `INFO` or more verbose, maneuver progress is
///   reported at `INFO` and a quieter log is useless for post-run analysis.
/// - This function must only be called once, `fern` refuses a second global
///   logger.
pub fn logger_init(
    min_level: LevelFilter, 
    cycle_level: LevelFilter,
    session: &session::Session
) -> Result<(), LoggerInitError> {

    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            let elapsed_s = session::get_elapsed_seconds();

            // Verbose records carry their target so cycle output can be told
            // apart from maneuver output
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{:10.6} {}] {}: {}",
                    elapsed_s,
                    level_tag(record.level()),
                    record.target(),
                    message
                ))
            }
            else {
                out.finish(format_args!(
                    "[{:10.6} {}] {}",
                    elapsed_s,
                    level_tag(record.level()),
                    message
                ))
            }
        })
        .level(min_level);

    for target in CYCLE_TARGETS.iter() {
        dispatch = dispatch.level_for(*target, cycle_level.min(min_level));
    }

    dispatch
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;
    
    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?} (control cycles: {:?})", min_level, cycle_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Coloured three letter tag for a log level
fn level_tag(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}
