//! Wall following executable entry point.
//!
//! Builds the vehicle, loads parameters and runs one navigation command
//! given on the command line, for example:
//!
//! ```text
//! wall_exec follow --cycles 2
//! wall_exec follow --lite
//! wall_exec plan
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, LevelFilter};
use structopt::StructOpt;

// Internal
use util::{archive::Archiver, logger::logger_init, session::Session};
use wall_lib::{
    nav_ctrl::{MnvrOutcome, NavCtrl, NavCtrlParams},
    params::WallExecParams,
    scan_proc::ScanProcParams,
    sim::SimCar,
    steer_ctrl::SteerCtrlParams
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "wall_exec", about = "Wall following vehicle executable")]
struct Opts {
    /// Executable parameter file, relative to the parameters directory.
    #[structopt(long, default_value = "wall_exec.toml")]
    params: String,

    /// Minimum log level, one of info, debug or trace.
    #[structopt(long, default_value = "debug")]
    log_level: LevelFilter,

    /// Log level of the per-cycle controller output.
    #[structopt(long, default_value = "info")]
    cycle_log_level: LevelFilter,

    #[structopt(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, StructOpt)]
enum Cmd {
    /// Follow walls on the left.
    #[structopt(name = "follow")]
    Follow {
        /// Number of wall following cycles.
        #[structopt(long, default_value = "2")]
        cycles: u32,

        /// Start alongside a wall, skipping the align and approach stages.
        #[structopt(long)]
        lite: bool,
    },

    /// Scan, plan a waypoint through the gap between the two longest walls
    /// and optionally drive to it.
    #[structopt(name = "plan")]
    Plan {
        #[structopt(long)]
        drive: bool,
    },

    /// Drive to a target in the first open sector.
    #[structopt(name = "open-sector")]
    OpenSector,

    /// Hold the current heading while driving forward.
    #[structopt(name = "steer-test")]
    SteerTest {
        #[structopt(long, default_value = "50")]
        cycles: u64,
    },
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    let session = Session::new("wall_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    logger_init(opts.log_level, opts.cycle_log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Wallcar Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: WallExecParams = util::params::load(&opts.params)
        .wrap_err("Could not load exec params")?;
    let scan_params: ScanProcParams = util::params::load(&exec_params.scan_proc_params)
        .wrap_err("Could not load scan processing params")?;
    let steer_params: SteerCtrlParams = util::params::load(&exec_params.steer_ctrl_params)
        .wrap_err("Could not load steering control params")?;
    let nav_params: NavCtrlParams = util::params::load(&exec_params.nav_ctrl_params)
        .wrap_err("Could not load navigation control params")?;
    nav_params.validate()
        .wrap_err("Invalid navigation control params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    let car = SimCar::new(exec_params.sim.clone());

    let mut nav_ctrl = NavCtrl::new(car, nav_params, scan_params, steer_params);
    if exec_params.archive_steering {
        nav_ctrl = nav_ctrl.with_steer_archiver(
            Archiver::from_path(&session, "steer_ctrl.csv")
                .wrap_err("Failed to open the steering archive")?
        );
    }

    info!("Initialisation complete\n");

    // ---- RUN ----

    let run = match opts.cmd {
        Cmd::Follow { cycles, lite } => {
            let records = if lite {
                nav_ctrl.follow_walls_left_lite(cycles)
            }
            else {
                nav_ctrl.follow_walls_left(cycles)
            };
            records.map(|r| {
                for rec in r {
                    info!("Cycle {} {:?}: {:?}", rec.cycle, rec.stage, rec.outcome);
                }
            })
        },
        Cmd::Plan { drive } => nav_ctrl.scan_and_plan(0).and_then(|plan| {
            if drive {
                nav_ctrl.drive_to_waypoint(plan.course_deg, plan.range_cm).map(log_outcome)
            }
            else {
                Ok(())
            }
        }),
        Cmd::OpenSector => nav_ctrl.goto_open_sector(0).map(log_outcome),
        Cmd::SteerTest { cycles } => nav_ctrl.pid_steer_test(cycles).map(log_outcome),
    };

    // Leave the vehicle stopped whatever happened
    let stopped = nav_ctrl.stop();

    let result = run
        .wrap_err("Navigation failed")
        .and_then(|_| stopped.wrap_err("Failed to stop the vehicle"));

    info!("End of execution");

    session.exit();

    result
}

fn log_outcome(outcome: MnvrOutcome) {
    info!("Maneuver outcome: {:?}", outcome);
}
