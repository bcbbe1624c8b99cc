//! Wall following sequences

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;

use super::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Record of one stage of a wall following sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageRecord {
    pub cycle: u32,
    pub stage: Stage,
    pub outcome: MnvrOutcome,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Stages of one wall following cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Align,
    Approach,
    Along,
    Around,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C> NavCtrl<C>
where
    C: MotionInterface + ScanInterface
{
    /// Follow walls on the left for a number of cycles.
    ///
    /// Each cycle aligns to the closest wall, approaches it sideways to the
    /// clearance, drives along it to its end and turns the corner. An
    /// interrupted stage does not stop the sequence.
    pub fn follow_walls_left(&mut self, n_cycles: u32) -> Result<Vec<StageRecord>, NavError> {
        self.follow_walls(n_cycles, false)
    }

    /// Follow walls on the left starting alongside a wall, so each cycle only
    /// drives along the wall and turns the corner.
    pub fn follow_walls_left_lite(&mut self, n_cycles: u32) -> Result<Vec<StageRecord>, NavError> {
        self.follow_walls(n_cycles, true)
    }

    fn follow_walls(&mut self, n_cycles: u32, lite: bool) -> Result<Vec<StageRecord>, NavError> {
        let mut records = Vec::new();
        let speed = self.params.speed;
        let clearance = self.params.clearance_cm;

        for cycle in 0..n_cycles {
            let mut nmbr = cycle * 100;
            let mut record = |stage: Stage, outcome: MnvrOutcome| {
                if let MnvrOutcome::Interrupted(o) = outcome {
                    info!("{:?} interrupted by {:?}, continuing", stage, o);
                }
                records.push(StageRecord { cycle, stage, outcome });
            };

            if !lite {
                info!("Cycle {}: aligning to wall on left, scan {}", cycle, nmbr);
                self.align_to_wall(nmbr)?;
                record(Stage::Align, MnvrOutcome::Complete);
                nmbr += 1;

                info!("Cycle {}: approaching wall on left, scan {}", cycle, nmbr);
                let outcome = self.approach_wall(self.params.dir_left_deg, speed, clearance, nmbr)?;
                record(Stage::Approach, outcome);
                nmbr += 1;
            }

            info!("Cycle {}: driving along wall on left, scan {}", cycle, nmbr);
            let along = self.drive_along_wall_on_left(speed, clearance, nmbr)?;
            record(Stage::Along, along.outcome);

            info!("Cycle {}: turning corner, heading {:.1} deg", cycle, self.heading()?);
            self.radius_turn_on_the_go(speed, self.params.dir_fwd_deg, 90.0, along.wall_distance_cm)?;
            record(Stage::Around, MnvrOutcome::Complete);
            info!("Cycle {}: heading after turn {:.1} deg", cycle, self.heading()?);
        }

        Ok(records)
    }
}
