//! Open space maneuvers

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;
use util::geom;

use crate::scan_proc::GapPlan;

use super::*;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C> NavCtrl<C>
where
    C: MotionInterface + ScanInterface
{
    /// Scan and plan a waypoint through the gap between the two longest
    /// walls.
    pub fn scan_and_plan(&mut self, nmbr: u32) -> Result<GapPlan, NavError> {
        let scan = self.scan(nmbr)?;
        debug!("Regions: {:?}, zero regions: {:?}", scan.regions(), scan.zero_regions());

        let plan = scan.find_gap_waypoint().ok_or(NavError::NoUsableGap(nmbr))?;
        info!(
            "Gap between {:?} and {:?}, course {:.1} deg, range {:.1} cm",
            plan.gap_ends.0, plan.gap_ends.1, plan.course_deg, plan.range_cm
        );

        Ok(plan)
    }

    /// Turn onto the course of a relative waypoint and drive forward to it,
    /// holding the new heading.
    pub fn drive_to_waypoint(&mut self, course_deg: f64, range_cm: f64) -> Result<MnvrOutcome, NavError> {
        let heading = self.heading()?;
        self.turn_to(heading - course_deg)?;

        let target = self.heading()?;
        let duration_s = range_cm / self.params.rate_cm_s;
        info!("Driving {:.1} cm at heading {:.1} deg", range_cm, target);

        let steer = SteerCtrl::new(target, &self.steer_params);
        self.drive_for(self.params.speed, self.params.dir_fwd_deg, duration_s, Some(steer))
    }

    /// Scan, pick a target in an open sector and drive to it.
    pub fn goto_open_sector(&mut self, nmbr: u32) -> Result<MnvrOutcome, NavError> {
        let target = self.scan(nmbr)?
            .open_sector_target()
            .ok_or(NavError::NoOpenSector(nmbr))?;

        let (range_cm, theta_rad) = geom::rect_to_polar(&target.target);
        let course_deg = theta_rad.to_degrees() - 90.0;
        info!(
            "Open sector {:.0} to {:.0} deg at {:.0} cm, course {:.1} deg",
            target.sector.start_deg, target.sector.end_deg, target.radius_cm, course_deg
        );

        self.drive_to_waypoint(course_deg, range_cm)
    }
}
